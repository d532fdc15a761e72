//! Property-based tests for lint scheduling decisions.

use std::sync::Arc;

use proptest::prelude::*;

use lintterm_core::{LintSettings, TextDocument};
use lintterm_lint::testing::{
    InMemoryDocuments, LintCall, RecordingInterpreterService, RecordingLintingEngine,
    RecordingWorkspace, SectionChange, StaticConfiguration, StaticLinterManager,
};
use lintterm_lint::{LintReason, LintScheduler, LintSchedulerConfig, LintServices, LinterInfo};

struct Harness {
    scheduler: LintScheduler,
    documents: Arc<InMemoryDocuments>,
    workspace: Arc<RecordingWorkspace>,
    configuration: Arc<StaticConfiguration>,
    engine: Arc<RecordingLintingEngine>,
    rt: tokio::runtime::Runtime,
}

impl Harness {
    fn new(linters: Vec<LinterInfo>) -> Self {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let documents = Arc::new(InMemoryDocuments::new());
        let workspace = Arc::new(RecordingWorkspace::new());
        let configuration = Arc::new(StaticConfiguration::new(LintSettings::default()));
        let engine = Arc::new(RecordingLintingEngine::new());
        let services = LintServices {
            documents: documents.clone(),
            workspace: workspace.clone(),
            configuration: configuration.clone(),
            linters: Arc::new(StaticLinterManager::new(linters)),
            engine: engine.clone(),
            interpreters: Arc::new(RecordingInterpreterService::new()),
        };
        let config = LintSchedulerConfig {
            run_startup_pass: false,
            ..LintSchedulerConfig::default()
        };
        let scheduler = LintScheduler::with_runtime(services, config, rt.handle().clone());
        Self {
            scheduler,
            documents,
            workspace,
            configuration,
            engine,
            rt,
        }
    }

    /// Run detached tasks until they are done.
    fn settle(&self) {
        self.rt.block_on(async {
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }
        });
    }
}

proptest! {
    /// A configuration change re-lints exactly the documents it affects.
    #[test]
    fn configuration_change_relints_affected_subset(
        affected in prop::collection::vec(any::<bool>(), 1..8)
    ) {
        let harness = Harness::new(Vec::new());
        let docs: Vec<TextDocument> = (0..affected.len())
            .map(|i| TextDocument::from_path(format!("/work/m{i}.py"), "python").unwrap())
            .collect();
        for doc in &docs {
            harness.documents.open(doc.clone());
        }
        harness.settle();
        harness.engine.reset();

        let mut change = SectionChange::new("python.linting.pylintEnabled");
        let mut expected = Vec::new();
        for (doc, hit) in docs.iter().zip(&affected) {
            if *hit {
                change = change.scoped_to(&doc.uri);
                expected.push(LintCall::Document(
                    doc.uri.clone(),
                    LintReason::ConfigurationChanged,
                ));
            }
        }
        if expected.is_empty() {
            change = SectionChange::new("editor.tabSize");
        }
        harness.workspace.change_configuration(change);
        harness.settle();

        let mut calls = harness.engine.calls();
        calls.sort_by_key(|call| format!("{call:?}"));
        expected.sort_by_key(|call| format!("{call:?}"));
        prop_assert_eq!(calls, expected);
    }

    /// Saving a watched config file never lints immediately, whatever its case.
    #[test]
    fn config_file_save_never_lints_immediately(
        name in prop::sample::select(vec![".flake8", "setup.cfg", "tox.ini"]),
        upper in any::<bool>(),
    ) {
        let name = if upper { name.to_uppercase() } else { name.to_string() };
        let flake8 = LinterInfo::new("flake8", [".flake8", "setup.cfg", "tox.ini"]);
        let harness = Harness::new(vec![flake8]);
        harness.configuration.set_default(LintSettings {
            enabled: false,
            lint_on_save: false,
        });
        let doc = TextDocument::from_path(format!("/work/{name}"), "plaintext").unwrap();

        harness.documents.save(&doc);
        harness.settle();

        prop_assert!(harness.engine.calls().is_empty());
        prop_assert_eq!(harness.scheduler.pending_timers(), 1);
    }
}
