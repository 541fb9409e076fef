use std::future::Future;
use std::pin::pin;
use std::task::{Context as TaskContext, Poll, Waker};

/// Drives a future to completion on the current thread.
///
/// Only used for wgpu's adapter and device requests, which resolve without
/// an external reactor on native backends.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    let mut cx = TaskContext::from_waker(Waker::noop());
    let mut future = pin!(future);
    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(v) => return v,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

/// Hides the console window the process was started from.
///
/// Only does something on Windows; elsewhere it is a no-op. The display
/// code never depends on it.
pub fn hide_console() {
    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Console::GetConsoleWindow;
        use windows_sys::Win32::UI::WindowsAndMessaging::{SW_HIDE, ShowWindow};

        // SAFETY: neither call takes pointers we own; a null console handle
        // is checked before use.
        unsafe {
            let hwnd = GetConsoleWindow();
            if !hwnd.is_null() {
                ShowWindow(hwnd, SW_HIDE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_console_returns() {
        hide_console();
        hide_console();
    }

    #[test]
    fn test_block_on_ready_future() {
        assert_eq!(block_on(async { 40 + 2 }), 42);
    }

    #[test]
    fn test_block_on_pending_then_ready() {
        struct YieldOnce(bool);
        impl Future for YieldOnce {
            type Output = &'static str;
            fn poll(mut self: std::pin::Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
                if self.0 {
                    Poll::Ready("done")
                } else {
                    self.0 = true;
                    Poll::Pending
                }
            }
        }
        assert_eq!(block_on(YieldOnce(false)), "done");
    }
}
