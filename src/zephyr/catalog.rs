use crate::zephyr::error::ZephyrError;
use crate::zephyr::model::TestCase;

/// Test cases fetched once per project and used for (folder, name) lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    test_cases: Vec<TestCase>,
}

impl Catalog {
    pub fn new(test_cases: Vec<TestCase>) -> Self {
        Self { test_cases }
    }

    /// Find the single test case named `name` inside folder `folder_name`.
    ///
    /// Zero matches and multiple matches are both errors: a run can only be
    /// bound to one test case.
    pub fn resolve(&self, folder_name: &str, name: &str) -> Result<&TestCase, ZephyrError> {
        let mut matches = self
            .test_cases
            .iter()
            .filter(|tc| tc.folder_name() == Some(folder_name) && tc.name == name);

        let Some(first) = matches.next() else {
            tracing::error!(folder = folder_name, name, "[filterTestcase] no testcase found");
            return Err(ZephyrError::TestCaseNotFound {
                folder: folder_name.to_string(),
                name: name.to_string(),
            });
        };

        let extra = matches.count();
        if extra > 0 {
            tracing::error!(
                folder = folder_name,
                name,
                count = extra + 1,
                "[filterTestcase] testcase is ambiguous"
            );
            return Err(ZephyrError::AmbiguousTestCase {
                folder: folder_name.to_string(),
                name: name.to_string(),
                count: extra + 1,
            });
        }

        Ok(first)
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }
}

impl From<Vec<TestCase>> for Catalog {
    fn from(test_cases: Vec<TestCase>) -> Self {
        Self::new(test_cases)
    }
}
