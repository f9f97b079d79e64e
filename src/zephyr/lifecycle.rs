use std::fmt;
use std::sync::Arc;

use crate::zephyr::catalog::Catalog;
use crate::zephyr::client::ZephyrClient;
use crate::zephyr::error::ZephyrError;
use crate::zephyr::model::{TestResultDetails, TestRunId, TestStatus};
use crate::zephyr::transport::Transport;

/// Where one test case is in its remote bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    CatalogLoaded,
    RunCreated { test_run_id: TestRunId },
    RunFinalized { test_run_id: TestRunId, status: TestStatus },
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::CatalogLoaded => write!(f, "catalog loaded"),
            LifecycleState::RunCreated { test_run_id } => write!(f, "run {} created", test_run_id),
            LifecycleState::RunFinalized { test_run_id, .. } => {
                write!(f, "run {} finalized", test_run_id)
            }
        }
    }
}

/// Ordered lookup → create → update for a single test case.
///
/// Each step only runs from the state the previous step left behind. A
/// failed step leaves the state unchanged and the rest of the lifecycle is
/// abandoned by the caller; nothing is retried.
pub struct TestRunLifecycle<'c, T: Transport> {
    client: &'c ZephyrClient<T>,
    catalog: Option<Arc<Catalog>>,
    state: LifecycleState,
}

impl<'c, T: Transport> TestRunLifecycle<'c, T> {
    pub fn new(client: &'c ZephyrClient<T>) -> Self {
        Self {
            client,
            catalog: None,
            state: LifecycleState::Uninitialized,
        }
    }

    /// Start from a catalog fetched earlier, e.g. by a previous test case.
    pub fn with_catalog(client: &'c ZephyrClient<T>, catalog: Arc<Catalog>) -> Self {
        Self {
            client,
            catalog: Some(catalog),
            state: LifecycleState::CatalogLoaded,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog.clone()
    }

    pub fn test_run_id(&self) -> Option<TestRunId> {
        match self.state {
            LifecycleState::RunCreated { test_run_id }
            | LifecycleState::RunFinalized { test_run_id, .. } => Some(test_run_id),
            _ => None,
        }
    }

    /// Uninitialized → CatalogLoaded.
    pub fn load_catalog(&mut self) -> Result<Arc<Catalog>, ZephyrError> {
        self.require("load the catalog", |s| matches!(s, LifecycleState::Uninitialized))?;
        let catalog = Arc::new(self.client.get_all_testcases()?);
        self.catalog = Some(Arc::clone(&catalog));
        self.state = LifecycleState::CatalogLoaded;
        Ok(catalog)
    }

    /// CatalogLoaded → RunCreated.
    pub fn create_run(&mut self, folder_name: &str, name: &str) -> Result<TestRunId, ZephyrError> {
        self.require("create a test run", |s| matches!(s, LifecycleState::CatalogLoaded))?;
        let Some(catalog) = self.catalog.as_deref() else {
            return Err(self.invalid("create a test run"));
        };
        let test_run_id = self.client.create_new_testrun(catalog, folder_name, name)?;
        self.state = LifecycleState::RunCreated { test_run_id };
        Ok(test_run_id)
    }

    /// RunCreated → RunFinalized.
    pub fn finalize(&mut self, test_status: Option<bool>) -> Result<TestStatus, ZephyrError> {
        let LifecycleState::RunCreated { test_run_id } = self.state else {
            return Err(self.invalid("update the test result"));
        };
        let status = self
            .client
            .update_test_result(&TestResultDetails::new(test_run_id, test_status))?;
        self.state = LifecycleState::RunFinalized { test_run_id, status };
        Ok(status)
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: impl Fn(&LifecycleState) -> bool,
    ) -> Result<(), ZephyrError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> ZephyrError {
        tracing::error!(state = %self.state, operation, "lifecycle step called out of order");
        ZephyrError::InvalidTransition {
            operation,
            state: self.state.to_string(),
        }
    }
}
