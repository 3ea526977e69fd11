//! Graceful shutdown against a real listener

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, TestApp};
    use eiga_api::core::ShutdownState;
    use eiga_api::server::HttpServer;
    use std::net::{SocketAddr, TcpListener};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::watch;

    async fn get(addr: SocketAddr, path: &str) -> std::io::Result<String> {
        let mut stream = TcpStream::connect(addr).await?;
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        );
        stream.write_all(request.as_bytes()).await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        Ok(response)
    }

    #[actix_web::test]
    async fn test_drain_waits_for_background_jobs_then_releases_store() {
        let app = TestApp::new(ConfigFactory::live());
        let state = app.state.clone();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let (release, _) = watch::channel(false);
        for _ in 0..3 {
            let mut gate = release.subscribe();
            state.tracker.run("held_mail", move || async move {
                gate.wait_for(|open| *open)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            });
        }

        let driver = async {
            let response = get(addr, "/v1/healthcheck").await.unwrap();
            assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
            assert!(response.contains(r#""status":"available""#));

            assert!(state.shutdown.begin_drain("test requested shutdown"));
            assert!(!state.shutdown.begin_drain("second request"));

            // HTTP has stopped but three jobs are still outstanding
            tokio::time::sleep(Duration::from_millis(1500)).await;
            assert_eq!(state.shutdown.state(), ShutdownState::Draining);
            assert_eq!(state.tracker.outstanding(), 3);
            assert!(!state.storage.is_closed());

            release.send_replace(true);
        };

        let (served, ()) = tokio::join!(HttpServer::with_state(state.clone()).serve(listener), driver);

        served.unwrap();
        assert_eq!(state.shutdown.state(), ShutdownState::Stopped);
        assert_eq!(state.tracker.outstanding(), 0);
        assert!(state.storage.is_closed());
    }

    #[actix_web::test]
    async fn test_shutdown_with_no_background_work() {
        let app = TestApp::new(ConfigFactory::live());
        let state = app.state.clone();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            state.shutdown.begin_drain("test requested shutdown");
        };

        let (served, ()) = tokio::join!(HttpServer::with_state(state.clone()).serve(listener), driver);

        served.unwrap();
        assert_eq!(state.shutdown.state(), ShutdownState::Stopped);
        assert!(state.storage.is_closed());
    }
}
