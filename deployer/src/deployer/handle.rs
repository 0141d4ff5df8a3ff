use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    sync::{
        mpsc::{channel, Receiver, Sender},
        Arc, Mutex, MutexGuard,
    },
};

#[cfg(test)]
use std::time::Duration;

type SharedBuffer = Arc<Mutex<VecDeque<u8>>>;

fn lock(buffer: &SharedBuffer) -> io::Result<MutexGuard<'_, VecDeque<u8>>> {
    buffer
        .lock()
        .map_err(|_e| io::Error::other("Log buffer mutex is poisoned"))
}

#[derive(Clone)]
struct LogWriter {
    buffer: SharedBuffer,
    notify: Sender<()>,
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.notify.send(()).ok();
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = lock(&self.buffer)?.write(buf)?;
        self.notify.send(()).ok();
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read side of one log stream. Reads block until data arrives and return
/// end of file once every writer is dropped and the buffer is drained.
#[derive(Debug)]
pub struct LogStream {
    buffer: SharedBuffer,
    notify: Receiver<()>,
}

impl LogStream {
    fn wait_for_data(&mut self) -> io::Result<()> {
        loop {
            if !lock(&self.buffer)?.is_empty() {
                return Ok(());
            }
            #[cfg(test)]
            match self.notify.recv_timeout(Duration::from_secs(3)) {
                Ok(_) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    panic!("Waited too long for deployment logs")
                }
                Err(_) => return Ok(()),
            }
            #[cfg(not(test))]
            if self.notify.recv().is_err() {
                return Ok(());
            }
        }
    }
}

impl Read for LogStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.wait_for_data()?;
        lock(&self.buffer)?.read(buf)
    }
}

/// Write side handed to a deployment. Clones share the same streams.
#[derive(Clone)]
pub struct DeploymentHandle {
    info: LogWriter,
    error: LogWriter,
}

impl DeploymentHandle {
    pub fn info(&mut self) -> &mut dyn Write {
        &mut self.info
    }

    pub fn error(&mut self) -> &mut dyn Write {
        &mut self.error
    }
}

#[derive(Debug)]
pub struct DeploymentLogs {
    info: LogStream,
    error: LogStream,
}

impl DeploymentLogs {
    pub fn info(&mut self) -> &mut dyn Read {
        &mut self.info
    }

    pub fn error(&mut self) -> &mut dyn Read {
        &mut self.error
    }

    pub fn into_read(self) -> (LogStream, LogStream) {
        (self.info, self.error)
    }
}

fn log_stream() -> (LogWriter, LogStream) {
    let (notify, receiver) = channel();
    let buffer = SharedBuffer::default();
    (
        LogWriter {
            buffer: buffer.clone(),
            notify,
        },
        LogStream {
            buffer,
            notify: receiver,
        },
    )
}

/// Creates the info and error streams of one deployment.
pub fn deployment_handle() -> (DeploymentHandle, DeploymentLogs) {
    let (info_writer, info_reader) = log_stream();
    let (error_writer, error_reader) = log_stream();

    (
        DeploymentHandle {
            info: info_writer,
            error: error_writer,
        },
        DeploymentLogs {
            info: info_reader,
            error: error_reader,
        },
    )
}
