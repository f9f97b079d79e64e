use std::cell::RefCell;
use std::collections::VecDeque;

use zephyr_harness::zephyr::error::ZephyrError;
use zephyr_harness::zephyr::transport::{ApiRequest, ApiResponse, Transport};

/// Replays scripted responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<ApiResponse>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn push(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ZephyrError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ZephyrError::Transport {
                context: format!("mock {}", request.url()),
                source: "no scripted response left".into(),
            })
    }
}
