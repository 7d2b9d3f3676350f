//! Tests against a real Chromium.
//!
//! Run with `CHROME_PATH=/path/to/chrome cargo test -- --ignored`.

use resume_pdf::{
    render, ChromiumLauncher, Descriptor, ErrorKind, LaunchOptions, Launcher, Locale,
    RenderJob, RenderOptions, Session, Style,
};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PAGE: &str = "<!doctype html><html><body><h1>Resume</h1></body></html>";

/// Serve `/ok` with 200 and everything else with 404.
async fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = if path == "/ok" {
                    ("200 OK", PAGE)
                } else {
                    ("404 Not Found", "not found")
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

fn job(path: &str, filename: &str, base_url: &str, output_dir: &Path) -> RenderJob {
    let descriptor = Descriptor::new(filename, path, filename, Locale::En, Style::Ats);
    RenderJob::resolve(descriptor, base_url, output_dir)
}

#[tokio::test]
#[ignore = "needs a Chromium binary in CHROME_PATH"]
async fn test_chromium_renders_and_rejects_missing_page() {
    let chrome = std::env::var("CHROME_PATH").expect("CHROME_PATH not set");
    let base_url = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let options = RenderOptions::new().with_settle_delay(Duration::from_millis(100));

    let session = ChromiumLauncher::new()
        .launch(&LaunchOptions::new().with_executable(chrome))
        .await
        .unwrap();

    let missing = job("/missing", "missing.pdf", &base_url, dir.path());
    let err = render(session.as_ref(), &missing, &options)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Navigation);
    assert_eq!(err.document(), Some("missing.pdf"));
    assert!(!missing.output_path.exists());

    let ok = job("/ok", "ok.pdf", &base_url, dir.path());
    let document = render(session.as_ref(), &ok, &options).await.unwrap();
    assert!(document.bytes > 0);
    assert!(resume_pdf::detect::is_pdf_file(&ok.output_path));

    session.close().await.unwrap();
}
