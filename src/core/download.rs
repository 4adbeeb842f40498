use crate::error::{InstallerError, Result};
use crate::utils::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry delays are drawn from `MIN_RETRY_DELAY_SECS..MAX_RETRY_DELAY_SECS`.
const MIN_RETRY_DELAY_SECS: u64 = 3;
const MAX_RETRY_DELAY_SECS: u64 = 15;

/// Something that can answer a GET with a readable body.
pub trait Transport {
    fn get(&self, url: &str) -> anyhow::Result<Box<dyn Read>>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        // The installer archive is large; only the connect phase is bounded.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .user_agent(concat!("acrobat-installer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstallerError::config_error(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> anyhow::Result<Box<dyn Read>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(Box::new(response))
    }
}

pub struct Downloader<T> {
    transport: T,
    sleep: Box<dyn Fn(Duration)>,
    jitter: Box<dyn Fn() -> Duration>,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sleep: Box::new(std::thread::sleep),
            jitter: Box::new(|| {
                Duration::from_secs(fastrand::u64(MIN_RETRY_DELAY_SECS..MAX_RETRY_DELAY_SECS))
            }),
        }
    }

    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn with_jitter(mut self, jitter: impl Fn() -> Duration + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Downloads `url` to `destination`, making up to `attempts` tries.
    ///
    /// Attempts after the first wait a random delay unless `skip_delay` is set.
    /// The destination is truncated on every attempt, so a failed partial copy
    /// is overwritten by the next one.
    pub fn download_file(
        &self,
        url: &str,
        destination: &Path,
        attempts: u32,
        skip_delay: bool,
    ) -> Result<()> {
        if let Some(parent) = destination.parent() {
            fs::ensure_dir_exists(parent).map_err(|e| InstallerError::Download {
                url: url.to_string(),
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }

        for attempt in 1..=attempts {
            if attempt > 1 && !skip_delay {
                let delay = (self.jitter)();
                println!("Waiting for {} seconds.", delay.as_secs());
                (self.sleep)(delay);
            }

            println!("Download attempt {attempt}");
            let mut body = match self.transport.get(url) {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("An error has occurred while downloading: {e:#}");
                    continue;
                }
            };

            let mut file = File::create(destination).map_err(|e| InstallerError::Download {
                url: url.to_string(),
                message: format!("cannot create {}: {e}", destination.display()),
            })?;

            match std::io::copy(&mut body, &mut file) {
                Ok(bytes) => {
                    log::debug!("Wrote {bytes} bytes to {}", destination.display());
                    println!("Download successful");
                    return Ok(());
                }
                Err(e) => log::warn!("File failed to download: {e}"),
            }
        }

        Err(InstallerError::FailedAfterRetries { attempts })
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{Reply, ScriptedTransport};
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const URL: &str = "https://downloads.example.com/AcrobatPro.zip";

    fn recording_downloader(
        replies: Vec<Reply>,
    ) -> (Downloader<ScriptedTransport>, Rc<RefCell<Vec<Duration>>>) {
        let slept = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&slept);
        let downloader = Downloader::new(ScriptedTransport::new(replies))
            .with_sleep(move |d| recorder.borrow_mut().push(d))
            .with_jitter(|| Duration::from_secs(7));
        (downloader, slept)
    }

    #[test]
    fn test_succeeds_on_third_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("AcrobatPro.zip");
        let (downloader, slept) = recording_downloader(vec![
            Reply::Refused,
            Reply::Truncated(b"stale partial payload from attempt two".to_vec()),
            Reply::Body(b"attempt three".to_vec()),
        ]);

        downloader.download_file(URL, &dest, 3, false).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"attempt three".to_vec());
        assert_eq!(downloader.transport().calls(), 3);
        assert_eq!(
            *slept.borrow(),
            vec![Duration::from_secs(7), Duration::from_secs(7)]
        );
    }

    #[test]
    fn test_stops_after_first_success() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("AcrobatPro.zip");
        let (downloader, slept) = recording_downloader(vec![
            Reply::Body(b"first".to_vec()),
            Reply::Body(b"second".to_vec()),
        ]);

        downloader.download_file(URL, &dest, 3, false).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"first".to_vec());
        assert_eq!(downloader.transport().calls(), 1);
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_exhaustion_reports_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("AcrobatPro.zip");
        let (downloader, slept) = recording_downloader(Vec::new());

        let err = downloader.download_file(URL, &dest, 3, false).unwrap_err();

        assert!(matches!(err, InstallerError::FailedAfterRetries { attempts: 3 }));
        assert_eq!(downloader.transport().calls(), 3);
        assert_eq!(slept.borrow().len(), 2);
        assert!(!dest.exists());
    }

    #[test]
    fn test_skip_delay_never_sleeps() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("AcrobatPro.zip");
        let (downloader, slept) = recording_downloader(vec![Reply::Refused, Reply::Refused]);

        let err = downloader.download_file(URL, &dest, 2, true).unwrap_err();

        assert!(matches!(err, InstallerError::FailedAfterRetries { attempts: 2 }));
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("AcrobatPro.zip");
        let (downloader, _) = recording_downloader(vec![Reply::Body(b"zip".to_vec())]);

        downloader.download_file(URL, &dest, 1, false).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"zip".to_vec());
    }

    #[test]
    fn test_unwritable_parent_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let dest = blocker.join("nested").join("AcrobatPro.zip");
        let (downloader, _) = recording_downloader(vec![Reply::Body(b"zip".to_vec())]);

        let err = downloader.download_file(URL, &dest, 3, false).unwrap_err();

        match err {
            InstallerError::Download { url, .. } => assert_eq!(url, URL),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(downloader.transport().calls(), 0);
    }

    #[test]
    fn test_default_jitter_in_range() {
        let downloader = Downloader::new(ScriptedTransport::default());
        for _ in 0..100 {
            let delay = (downloader.jitter)().as_secs();
            assert!((MIN_RETRY_DELAY_SECS..MAX_RETRY_DELAY_SECS).contains(&delay));
        }
    }
}
