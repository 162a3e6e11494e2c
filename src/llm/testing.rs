//! 测试工具：假补全后端与日志捕获

use futures::future::BoxFuture;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing::Level;

use super::types::{CompletionBackend, CompletionRequest, LlmError};

/// 预设响应
#[derive(Clone)]
pub enum Canned {
    Content(String),
    ApiError(u16, String),
}

/// 记录调用次数的假后端
pub struct FakeBackend {
    calls: AtomicUsize,
    canned: Canned,
}

impl FakeBackend {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            canned,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionBackend for FakeBackend {
    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, LlmError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let canned = self.canned.clone();
        Box::pin(async move {
            match canned {
                Canned::Content(content) => Ok(content),
                Canned::ApiError(status, message) => Err(LlmError::ApiError { status, message }),
            }
        })
    }
}

/// 捕获当前线程的 tracing 输出
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// 安装线程内默认 subscriber，guard 释放前有效
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
