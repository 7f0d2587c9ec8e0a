use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use futures::StreamExt;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use tokio::{fs::File, io::AsyncWriteExt};
use url::Url;

use crate::error::{Error, FetchError};

/// Builds the client shared by every request of a run.
///
/// The origin rejects default client identifiers, hence the browser-like
/// user agent. Cookies persist across requests like a browser session.
/// `timeout` bounds each request end to end, so a stalled origin surfaces as
/// a transport failure.
pub fn client(user_agent: &str, timeout: Duration) -> Result<Client, Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .cookie_store(true)
        .build()
        .map_err(Error::Client)
}

async fn get(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(FetchError::Status {
            url: url.clone(),
            status,
        }),
    }
}

/// Fetches a listing page as text. No retries.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = get(client, url).await?;

    response
        .text()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })
}

/// Streams the body at `url` into `dest`, replacing whatever was there.
///
/// The body lands in `<dest>.part` first and is renamed over `dest` once
/// complete; a failed download leaves `dest` untouched.
pub async fn retrieve(client: &Client, url: &Url, dest: &Path) -> Result<PathBuf, FetchError> {
    let response = get(client, url).await?;
    let partial = partial_path(dest);

    match stream_to(response, url, &partial).await {
        Ok(written) => {
            tokio::fs::rename(&partial, dest)
                .await
                .map_err(|source| FetchError::Write {
                    path: dest.to_owned(),
                    source,
                })?;
            debug!("wrote {} bytes from {} to {}", written, url, dest.display());
            Ok(dest.to_owned())
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            Err(e)
        }
    }
}

async fn stream_to(response: Response, url: &Url, path: &Path) -> Result<usize, FetchError> {
    let write_error = |source| FetchError::Write {
        path: path.to_owned(),
        source,
    };

    let mut file = File::create(path).await.map_err(write_error)?;
    let mut body = response.bytes_stream();
    let mut written = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        file.write_all(&chunk).await.map_err(write_error)?;
        written += chunk.len();
    }
    file.flush().await.map_err(write_error)?;

    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serves one response that promises more body than it sends, then hangs up.
    async fn truncating_origin() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 1000\r\n\r\nCourse number,Cou")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        Url::parse(&format!("http://{}/csci.csv", addr)).unwrap()
    }

    #[tokio::test]
    async fn cut_off_download_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("csci_classes.csv");
        fs::write(&dest, "Course number\nCSCI 102\n").unwrap();
        let client = client("test", Duration::from_secs(5)).unwrap();

        let url = truncating_origin().await;
        let result = retrieve(&client, &url, &dest).await;

        assert!(matches!(result, Err(FetchError::Transport { .. })));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "Course number\nCSCI 102\n");
        assert!(!dir.path().join("csci_classes.csv.part").exists());
    }

    #[test]
    fn partial_file_sits_next_to_destination() {
        assert_eq!(
            partial_path(Path::new("usc_class_data/ee_classes.csv")),
            PathBuf::from("usc_class_data/ee_classes.csv.part")
        );
    }
}
