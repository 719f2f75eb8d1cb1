use std::sync::mpsc;

use crate::error::AppError;

/// Work running on its own thread, polled from the UI loop.
pub struct BackgroundTask<T> {
    receiver: Option<mpsc::Receiver<Result<T, AppError>>>,
}

impl<T: Send + 'static> BackgroundTask<T> {
    pub fn spawn<F>(task: F) -> Self
    where
        F: FnOnce() -> Result<T, AppError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = task();
            let _ = tx.send(result);
        });
        Self { receiver: Some(rx) }
    }

    /// Never blocks. A worker that died without answering yields an error.
    pub fn try_take(&mut self) -> Option<Result<T, AppError>> {
        let rx = self.receiver.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.receiver = None;
                Some(Err(disconnected()))
            }
        }
    }

    #[cfg(test)]
    pub fn take_blocking(&mut self) -> Result<T, AppError> {
        match self.receiver.take() {
            Some(rx) => rx.recv().unwrap_or_else(|_| Err(disconnected())),
            None => Err(disconnected()),
        }
    }
}

fn disconnected() -> AppError {
    AppError::Message("Background task channel disconnected".to_string())
}
