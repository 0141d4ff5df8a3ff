use super::DeploymentHandle;
use crate::transfer::{RequestType, TransferEvent, TransferListener};

/// Writes upload progress lines to the info and error streams of a deployment.
#[derive(Clone)]
pub struct ProgressListener {
    handle: DeploymentHandle,
}

impl ProgressListener {
    pub fn new(handle: DeploymentHandle) -> Self {
        ProgressListener { handle }
    }
}

fn size_label(content_length: u64) -> String {
    if content_length >= 1024 {
        format!("{}K", content_length / 1024)
    } else {
        format!("{}b", content_length)
    }
}

impl TransferListener for ProgressListener {
    fn transfer_initiated(&self, event: &TransferEvent) {
        let action = match event.request_type {
            RequestType::Put => "Uploading",
            RequestType::Get => "Downloading",
        };
        let mut handle = self.handle.clone();
        writeln!(
            handle.info(),
            "{}: {}/{}",
            action,
            event.repository_url,
            event.resource.name
        )
        .ok();
    }

    fn transfer_started(&self, _event: &TransferEvent) {}

    fn transfer_progress(&self, _event: &TransferEvent, _buffer: &[u8]) {}

    fn transfer_completed(&self, event: &TransferEvent) {
        let Some(content_length) = event.resource.content_length else {
            return;
        };
        let action = match event.request_type {
            RequestType::Put => "uploaded",
            RequestType::Get => "downloaded",
        };
        let mut handle = self.handle.clone();
        writeln!(handle.info(), "{} {}", size_label(content_length), action).ok();
    }

    fn transfer_error(&self, event: &TransferEvent) {
        let message = event.error.as_deref().unwrap_or("unknown transfer error");
        error!("Transfer of {} failed: {}", event.resource.name, message);
        let mut handle = self.handle.clone();
        writeln!(handle.error(), "{}", message).ok();
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::*;
    use crate::{deployment_handle, transfer::Resource};

    fn event(content_length: Option<u64>) -> TransferEvent {
        TransferEvent {
            request_type: RequestType::Put,
            repository_url: "https://repo.example.com/releases".to_owned(),
            resource: Resource {
                name: "org/example/lib/1.0/lib-1.0.jar".to_owned(),
                content_length,
            },
            error: None,
        }
    }

    #[test]
    fn test_size_label() {
        assert_eq!(size_label(0), "0b");
        assert_eq!(size_label(1023), "1023b");
        assert_eq!(size_label(1024), "1K");
        assert_eq!(size_label(2048), "2K");
        assert_eq!(size_label(3000), "2K");
    }

    #[test]
    fn test_upload_lines() {
        let (handle, mut logs) = deployment_handle();
        let listener = ProgressListener::new(handle);

        listener.transfer_initiated(&event(Some(2048)));
        listener.transfer_started(&event(Some(2048)));
        listener.transfer_progress(&event(Some(2048)), &[0; 16]);
        listener.transfer_completed(&event(Some(2048)));
        listener.transfer_completed(&event(None));
        drop(listener);

        assert_eq!(
            io::read_to_string(logs.info()).unwrap(),
            concat!(
                "Uploading: https://repo.example.com/releases/org/example/lib/1.0/lib-1.0.jar\n",
                "2K uploaded\n"
            )
        );
    }

    #[test]
    fn test_error_goes_to_error_stream() {
        let (handle, mut logs) = deployment_handle();
        let listener = ProgressListener::new(handle);

        listener.transfer_error(&event(Some(10)).with_error("Connection refused"));
        drop(listener);

        assert_eq!(io::read_to_string(logs.error()).unwrap(), "Connection refused\n");
        assert_eq!(io::read_to_string(logs.info()).unwrap(), "");
    }
}
