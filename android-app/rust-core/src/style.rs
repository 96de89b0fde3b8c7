//! # Remote Map Styles
//!
//! `setMapStyle` takes a URL. The document is fetched on the tokio runtime
//! and posted back as a style loaded callback; the main context applies it
//! (or drops it, when a newer request superseded it).
//!
//! ```text
//! main ── load(request) ──► tokio task ── GET url ──► CallbackSender ──► main
//! ```

use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;

use navsdk_shared::traits::{StyleLoader, StyleRequest};
use navsdk_shared::{CallbackSender, NativeCallback};

pub struct HttpStyleLoader {
    runtime: Handle,
    client: reqwest::Client,
}

impl HttpStyleLoader {
    pub fn new(runtime: Handle, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { runtime, client })
    }
}

impl StyleLoader for HttpStyleLoader {
    fn load(&self, request: StyleRequest, sender: CallbackSender) {
        let client = self.client.clone();
        self.runtime.spawn(async move {
            let (style, error) = match fetch(&client, &request.url).await {
                Ok(style) => (Some(style), None),
                Err(e) => {
                    warn!("Style fetch for {} failed: {}", request.target, e);
                    (None, Some(e))
                }
            };
            let callback = NativeCallback::StyleLoaded {
                view_id: request.target,
                generation: request.generation,
                style,
                error,
            };
            if sender.send(callback).is_err() {
                debug!("Bridge gone before style for {} arrived", request.target);
            }
        });
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("{url}: request error: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("{url}: HTTP {}", response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| format!("{url}: invalid body: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use navsdk_shared::callback::CallbackQueue;
    use navsdk_shared::ViewTarget;

    #[test]
    fn test_bad_url_reports_error() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let loader = HttpStyleLoader::new(runtime.handle().clone(), Duration::from_secs(1)).unwrap();
        let mut queue = CallbackQueue::new();

        loader.load(
            StyleRequest {
                target: ViewTarget::View(3),
                generation: 9,
                url: "not a url".into(),
            },
            queue.sender(),
        );

        let callback = runtime.block_on(queue.next()).unwrap();
        match callback {
            NativeCallback::StyleLoaded {
                view_id,
                generation,
                style,
                error,
            } => {
                assert_eq!(view_id, ViewTarget::View(3));
                assert_eq!(generation, 9);
                assert!(style.is_none());
                assert!(error.unwrap().contains("not a url"));
            }
            other => panic!("unexpected callback {:?}", other),
        }
    }
}
