use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::guard::validate_values;
use crate::config::settings::Settings;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::LifecycleEvent;
use crate::zephyr::catalog::Catalog;
use crate::zephyr::error::ZephyrError;
use crate::zephyr::model::{
    CreatedTestRun, Environment, EnvironmentList, JiraAccount, NewTestRun, TestCaseList,
    TestResultBody, TestResultDetails, TestRunId, TestStatus,
};
use crate::zephyr::transport::{ApiRequest, Auth, HttpTransport, Method, Transport};

const TESTRESULT_PATH: &str = "/rest/tests/1.0/testresult";
const JIRA_USER_SEARCH_PATH: &str = "/rest/api/2/user/search?query&maxResults=2000";

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// Drives the test-management REST API for one configured project.
///
/// Stateless apart from the immutable [`Settings`]: the catalog and run ids
/// flow through return values (see `TestRunLifecycle` for the ordered
/// per-test-case wrapper).
pub struct ZephyrClient<T: Transport> {
    settings: Settings,
    transport: T,
    tracer: TraceLogger,
}

impl ZephyrClient<HttpTransport> {
    /// Client over real HTTP, honouring the configured timeout and trace file.
    pub fn connect(settings: Settings) -> Result<Self, ZephyrError> {
        let transport = HttpTransport::new(settings.timeout)?;
        Self::new(settings, transport)
    }
}

impl<T: Transport> ZephyrClient<T> {
    /// Fails with `ZephyrError::Config` when the trace file cannot be opened.
    pub fn new(settings: Settings, transport: T) -> Result<Self, ZephyrError> {
        let tracer = TraceLogger::for_settings(&settings)?;
        Ok(Self {
            settings,
            transport,
            tracer,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch every test case of the configured project.
    pub fn get_all_testcases(&self) -> Result<Catalog, ZephyrError> {
        let path = format!("/rest/tests/1.0/project/{}/testcases", self.settings.project_id);
        let request =
            ApiRequest::new(Method::Get, &self.settings.service_url, path, self.basic_auth());

        let result = self
            .transport
            .send(&request)
            .and_then(|r| r.expect_status("getAllTestcases", STATUS_OK))
            .and_then(|r| r.json::<TestCaseList>("testcases list"));

        match result {
            Ok(list) => {
                tracing::info!(count = list.test_cases.len(), "fetched testcase catalog");
                self.tracer.record(
                    &LifecycleEvent::now("get_all_testcases")
                        .with_outcome(format!("{} testcases", list.test_cases.len())),
                );
                Ok(Catalog::new(list.test_cases))
            }
            Err(e) => {
                self.tracer.record(&LifecycleEvent::now("get_all_testcases").with_error(&e));
                Err(e)
            }
        }
    }

    // ========================================================================
    // Run creation
    // ========================================================================

    /// Resolve (folder, name) in the catalog and create a test run for it.
    ///
    /// Resolution failures return before any request is issued.
    pub fn create_new_testrun(
        &self,
        catalog: &Catalog,
        folder_name: &str,
        name: &str,
    ) -> Result<TestRunId, ZephyrError> {
        let event = LifecycleEvent::now("create_new_testrun").with_test_case(folder_name, name);

        let result = catalog
            .resolve(folder_name, name)
            .and_then(|test_case| self.create_test_result(test_case.id));

        match result {
            Ok(test_run_id) => {
                tracing::info!(folder = folder_name, name, test_run_id, "created test run");
                self.tracer.record(&event.with_run(test_run_id));
                Ok(test_run_id)
            }
            Err(e) => {
                self.tracer.record(&event.with_error(&e));
                Err(e)
            }
        }
    }

    /// Create the test result entry for `test_case_id`; returns the run id.
    pub fn create_test_result(&self, test_case_id: u64) -> Result<TestRunId, ZephyrError> {
        let payload = NewTestRun {
            test_case_id,
            assigned_to: self.settings.assigned_user_id.clone(),
            environment_id: self.settings.environment_id,
        };

        let request = ApiRequest::new(
            Method::Post,
            &self.settings.service_url,
            TESTRESULT_PATH,
            self.basic_auth(),
        )
        .header("jira-project-id", self.settings.project_id.as_str())
        .json(&payload, "new test run")?;

        let created: CreatedTestRun = self
            .transport
            .send(&request)?
            .expect_status("createTestResult", STATUS_CREATED)?
            .json("created test run")?;

        Ok(created.id)
    }

    // ========================================================================
    // Result update
    // ========================================================================

    /// Record the final status of a test run.
    ///
    /// A missing status is reported as failed, with a warning, so an unknown
    /// outcome is never marked passed. Returns the status that was applied.
    pub fn update_test_result(
        &self,
        details: &TestResultDetails,
    ) -> Result<TestStatus, ZephyrError> {
        validate_values(
            "updateTestResult",
            &[("test_run_id", details.test_run_id.is_some())],
        )?;
        let test_run_id = details.test_run_id.unwrap_or_default();

        let status = TestStatus::from(details.test_status);
        match status {
            TestStatus::Passed => {}
            TestStatus::Failed => tracing::warn!(test_run_id, "test result status = \"failed\""),
            TestStatus::Unrecognized => {
                tracing::warn!(test_run_id, "test result status = \"default(failed)\"")
            }
        }
        let status_code = status.status_code(&self.settings.status_codes);
        let event = LifecycleEvent::now("update_test_result")
            .with_run(test_run_id)
            .with_status(status, status_code);

        match self.put_test_result(test_run_id, status_code) {
            Ok(()) => {
                self.tracer.record(&event);
                Ok(status)
            }
            Err(e) => {
                self.tracer.record(&event.with_error(&e));
                Err(e)
            }
        }
    }

    fn put_test_result(&self, test_run_id: TestRunId, status_code: u64) -> Result<(), ZephyrError> {
        let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
        let payload = [TestResultBody {
            id: test_run_id,
            test_result_status_id: status_code,
            user_key: self.settings.assigned_user_id.clone(),
            execution_date: now.clone(),
            actual_start_date: now,
        }];

        let request = ApiRequest::new(
            Method::Put,
            &self.settings.service_url,
            TESTRESULT_PATH,
            self.basic_auth(),
        )
        .header("jira-project-id", self.settings.project_id.as_str())
        .json(&payload, "test result update")?;

        self.transport
            .send(&request)?
            .expect_status("updateTestResult", STATUS_OK)?;
        Ok(())
    }

    // ========================================================================
    // Auxiliary reads
    // ========================================================================

    /// Environments defined for the configured project.
    pub fn get_environment_names(&self) -> Result<Vec<Environment>, ZephyrError> {
        let path = format!("/environments?projectKey={}", self.settings.project_key);
        let request = ApiRequest::new(
            Method::Get,
            &self.settings.zephyr_url,
            path,
            Auth::Bearer(self.settings.zephyr_api_token.clone()),
        );

        let list: EnvironmentList = self
            .transport
            .send(&request)?
            .expect_status("getEnvironmentNames", STATUS_OK)?
            .json("environment list")?;
        Ok(list.values)
    }

    /// Log every environment name, to help pick a valid configuration.
    pub fn log_environment_names(&self) -> Result<Vec<Environment>, ZephyrError> {
        let environments = self.get_environment_names()?;
        for environment in &environments {
            tracing::info!("Available environment: {}", environment.name);
        }
        Ok(environments)
    }

    pub fn get_jira_accounts(&self) -> Result<Vec<JiraAccount>, ZephyrError> {
        let request = ApiRequest::new(
            Method::Get,
            &self.settings.jira_url,
            JIRA_USER_SEARCH_PATH,
            Auth::EncodedBasic(self.settings.jira_api_token.clone()),
        );

        self.transport
            .send(&request)?
            .expect_status("getJiraAccounts", STATUS_OK)?
            .json("jira accounts")
    }

    /// Account id for the configured display name.
    ///
    /// Falls back to the default display name; `AccountNotFound` when
    /// neither matches exactly.
    pub fn get_jira_account_id(&self) -> Result<String, ZephyrError> {
        let accounts = self.get_jira_accounts()?;
        let candidates = [
            self.settings.jira_display_name.as_str(),
            self.settings.default_jira_display_name.as_str(),
        ];

        for display_name in candidates {
            if let Some(account) = accounts
                .iter()
                .find(|a| a.display_name.as_deref() == Some(display_name))
            {
                return Ok(account.account_id.clone());
            }
            tracing::warn!(display_name, "no Jira account with this display name");
        }

        Err(ZephyrError::AccountNotFound {
            display_names: candidates.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn basic_auth(&self) -> Auth {
        Auth::Basic {
            username: self.settings.username.clone(),
            password: self.settings.password.clone(),
        }
    }
}
