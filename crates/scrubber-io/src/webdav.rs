use crate::error::{IoError, Result};
use crate::upload::UploadTarget;

#[cfg(feature = "dav-upload")]
mod imp {
    use super::{IoError, Result, UploadTarget};
    use crate::upload::validate_segment;
    use reqwest::blocking::Client;
    use reqwest::Method;
    use std::time::Duration;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct WebDavTarget {
        base_url: Url,
        username: String,
        password: String,
        client: Client,
    }

    impl WebDavTarget {
        pub fn new(base_url: &str, username: String, password: String) -> Result<Self> {
            let base_url = Url::parse(base_url)?;
            if base_url.scheme() != "https" {
                return Err(IoError::InvalidTarget(
                    "webdav url must use https".to_string(),
                ));
            }
            if base_url.cannot_be_a_base() {
                return Err(IoError::InvalidTarget(format!(
                    "webdav url cannot hold folders: {base_url}"
                )));
            }
            let client = Client::builder()
                .user_agent(concat!("scrubber/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                base_url,
                username,
                password,
                client,
            })
        }

        fn collection_url(&self, folder: &str) -> Result<Url> {
            let mut url = self.base_url.clone();
            url.path_segments_mut()
                .map_err(|_| IoError::InvalidTarget("webdav url has no path".to_string()))?
                .pop_if_empty()
                .push(folder);
            Ok(url)
        }

        fn ensure_collection(&self, url: &Url) -> Result<()> {
            let mkcol = Method::from_bytes(b"MKCOL")
                .map_err(|_| IoError::InvalidTarget("invalid MKCOL method".to_string()))?;
            let response = self
                .client
                .request(mkcol, url.clone())
                .basic_auth(&self.username, Some(&self.password))
                .send()?;
            // 405 means the collection already exists.
            if response.status().is_success() || response.status().as_u16() == 405 {
                return Ok(());
            }
            response.error_for_status()?;
            Ok(())
        }
    }

    impl UploadTarget for WebDavTarget {
        fn target_name(&self) -> &'static str {
            "webdav"
        }

        fn upload(&self, folder: &str, file_name: &str, data: &[u8]) -> Result<String> {
            validate_segment("folder", folder)?;
            validate_segment("file", file_name)?;
            let collection = self.collection_url(folder.trim())?;
            self.ensure_collection(&collection)?;

            let mut url = collection;
            url.path_segments_mut()
                .map_err(|_| IoError::InvalidTarget("webdav url has no path".to_string()))?
                .push(file_name.trim());

            self.client
                .put(url.clone())
                .basic_auth(&self.username, Some(&self.password))
                .header("Content-Type", "text/csv; charset=utf-8")
                .body(data.to_vec())
                .send()?
                .error_for_status()?;
            Ok(url.to_string())
        }
    }

}

#[cfg(not(feature = "dav-upload"))]
mod imp {
    use super::{IoError, Result, UploadTarget};

    #[derive(Debug, Clone)]
    pub struct WebDavTarget {
        base_url: String,
        username: String,
        password: String,
    }

    impl WebDavTarget {
        pub fn new(base_url: &str, username: String, password: String) -> Result<Self> {
            Ok(Self {
                base_url: base_url.to_string(),
                username,
                password,
            })
        }
    }

    impl UploadTarget for WebDavTarget {
        fn target_name(&self) -> &'static str {
            "webdav"
        }

        fn upload(&self, _folder: &str, _file_name: &str, _data: &[u8]) -> Result<String> {
            let _ = (&self.base_url, &self.username, &self.password);
            Err(IoError::Unavailable(
                "WebDAV upload requires the dav-upload feature".to_string(),
            ))
        }
    }
}

pub use imp::WebDavTarget;
