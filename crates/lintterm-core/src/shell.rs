//! Shell classification and shell-appropriate command lines.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of shell running inside a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShellType {
    /// Windows PowerShell
    PowerShell,
    /// PowerShell Core (pwsh)
    PowerShellCore,
    /// Windows Command Prompt
    CommandPrompt,
    /// Git Bash on Windows
    GitBash,
    /// Bourne Again Shell
    Bash,
    /// Windows Subsystem for Linux launcher
    Wsl,
    /// Z Shell
    Zsh,
    /// Korn Shell
    Ksh,
    /// Fish Shell
    Fish,
    /// C Shell
    CShell,
    /// Tcsh
    TcShell,
    /// Xonsh
    Xonsh,
    /// Other/Unknown shell
    #[default]
    Other,
}

impl ShellType {
    /// Get a string representation of the shell type
    pub fn as_str(&self) -> &'static str {
        match self {
            ShellType::PowerShell => "powershell",
            ShellType::PowerShellCore => "powershellcore",
            ShellType::CommandPrompt => "commandprompt",
            ShellType::GitBash => "gitbash",
            ShellType::Bash => "bash",
            ShellType::Wsl => "wsl",
            ShellType::Zsh => "zsh",
            ShellType::Ksh => "ksh",
            ShellType::Fish => "fish",
            ShellType::CShell => "cshell",
            ShellType::TcShell => "tcshell",
            ShellType::Xonsh => "xonsh",
            ShellType::Other => "other",
        }
    }

    /// Whether commands need the PowerShell call operator.
    pub fn is_powershell(&self) -> bool {
        matches!(self, ShellType::PowerShell | ShellType::PowerShellCore)
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    // Checked in order; tcsh must win over csh.
    static ref SHELL_PATTERNS: Vec<(Regex, ShellType)> = vec![
        (Regex::new(r"(?i)gitbash(\.exe)?$").unwrap(), ShellType::GitBash),
        (Regex::new(r"(?i)bash(\.exe)?$").unwrap(), ShellType::Bash),
        (Regex::new(r"(?i)wsl\.exe$").unwrap(), ShellType::Wsl),
        (Regex::new(r"(?i)zsh$").unwrap(), ShellType::Zsh),
        (Regex::new(r"(?i)ksh$").unwrap(), ShellType::Ksh),
        (Regex::new(r"(?i)cmd(\.exe)?$").unwrap(), ShellType::CommandPrompt),
        (Regex::new(r"(?i)powershell(\.exe)?$").unwrap(), ShellType::PowerShell),
        (Regex::new(r"(?i)pwsh(\.exe)?$").unwrap(), ShellType::PowerShellCore),
        (Regex::new(r"(?i)fish$").unwrap(), ShellType::Fish),
        (Regex::new(r"(?i)tcsh$").unwrap(), ShellType::TcShell),
        (Regex::new(r"(?i)csh$").unwrap(), ShellType::CShell),
        (Regex::new(r"(?i)xonsh$").unwrap(), ShellType::Xonsh),
    ];
}

/// Classify a shell executable path.
///
/// Empty or unrecognised paths classify as [`ShellType::Other`].
///
/// # Examples
///
/// ```
/// use lintterm_core::shell::{identify_shell, ShellType};
///
/// assert_eq!(identify_shell("/bin/bash"), ShellType::Bash);
/// assert_eq!(identify_shell(r"C:\Windows\System32\cmd.exe"), ShellType::CommandPrompt);
/// assert_eq!(identify_shell(""), ShellType::Other);
/// ```
pub fn identify_shell(shell_path: &str) -> ShellType {
    let shell_path = shell_path.trim();
    if shell_path.is_empty() {
        return ShellType::Other;
    }
    SHELL_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(shell_path))
        .map(|(_, shell)| *shell)
        .unwrap_or(ShellType::Other)
}

/// Quote an argument containing spaces unless it is already quoted.
pub fn to_command_argument(value: &str) -> String {
    if value.contains(' ') && !value.starts_with('"') && !value.ends_with('"') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Quote a file path argument and normalise its separators to `/`.
pub fn file_to_command_argument(value: &str) -> String {
    to_command_argument(value).replace('\\', "/")
}

/// Build the line to submit to a terminal running `shell`.
///
/// PowerShell variants need the `&` call operator to run a quoted
/// executable path. Arguments are passed through untouched.
///
/// # Examples
///
/// ```
/// use lintterm_core::shell::{build_command_line, ShellType};
///
/// let args = vec!["-m".to_string(), "pip".to_string()];
/// assert_eq!(
///     build_command_line(ShellType::PowerShell, r"C:\Program Files\py.exe", &args),
///     "& \"C:/Program Files/py.exe\" -m pip"
/// );
/// assert_eq!(build_command_line(ShellType::Bash, "python", &args), "python -m pip");
/// ```
pub fn build_command_line(shell: ShellType, command: &str, args: &[String]) -> String {
    let prefix = if shell.is_powershell() { "& " } else { "" };
    let line = format!(
        "{}{} {}",
        prefix,
        file_to_command_argument(command),
        args.join(" ")
    );
    line.trim().to_string()
}
