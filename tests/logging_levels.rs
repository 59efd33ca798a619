//! `logging/setLevel` filtering, isolated in its own binary because the
//! minimum level is process-wide state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use rsmcp::logging::LogSink;
use rsmcp::protocol::{Implementation, LoggingCapability, ServerCapabilities};
use rsmcp::server::Handler;
use rsmcp::transport::{serve_connection, ServeOptions};

#[derive(Clone, Default)]
struct Buf(Arc<Mutex<Vec<u8>>>);

impl Buf {
    fn frames(&self) -> Vec<Value> {
        let data = self.0.lock().unwrap();
        String::from_utf8_lossy(&data)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl std::io::Write for Buf {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

async fn send_and_wait(
    writer: &mut io::WriteHalf<io::DuplexStream>,
    replies: &mut tokio::io::Lines<BufReader<io::ReadHalf<io::DuplexStream>>>,
    frame: Value,
) {
    writer
        .write_all(format!("{frame}\n").as_bytes())
        .await
        .unwrap();
    let reply = timeout(Duration::from_secs(5), replies.next_line())
        .await
        .expect("timed out waiting for a reply")
        .unwrap()
        .expect("connection closed before a reply arrived");
    let _: Value = serde_json::from_str(&reply).unwrap();
}

#[tokio::test]
async fn set_level_filters_subsequent_records() {
    let handler = Arc::new(Handler::new(
        ServerCapabilities {
            logging: Some(LoggingCapability {}),
            ..Default::default()
        },
        Implementation {
            name: "logging-test".into(),
            version: "0".into(),
        },
    ));

    let buf = Buf::default();
    let (client, server) = io::duplex(64 * 1024);
    let (server_read, server_write) = io::split(server);
    let (client_read, mut client_write) = io::split(client);
    let options = ServeOptions {
        log_sink: Some(LogSink::new(buf.clone())),
        ..Default::default()
    };
    let serve = tokio::spawn(async move {
        serve_connection(server_read, server_write, handler, options)
            .await
            .unwrap();
    });
    let mut replies = BufReader::new(client_read).lines();

    // The dispatcher logs each request at info through the "system" logger,
    // so pings double as log probes. Default minimum is info: the first
    // ping's record lands on the sink.
    send_and_wait(
        &mut client_write,
        &mut replies,
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
    )
    .await;
    let before = buf.frames().len();
    assert!(before >= 1, "expected an info record at the default level");

    // Raise the minimum; subsequent info records must be suppressed.
    send_and_wait(
        &mut client_write,
        &mut replies,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "logging/setLevel",
            "params": {"level": "warning"}
        }),
    )
    .await;
    let after_set = buf.frames().len();
    send_and_wait(
        &mut client_write,
        &mut replies,
        json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}),
    )
    .await;
    assert_eq!(buf.frames().len(), after_set);

    // Lower it again; records reappear.
    send_and_wait(
        &mut client_write,
        &mut replies,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "logging/setLevel",
            "params": {"level": "debug"}
        }),
    )
    .await;
    let after_reset = buf.frames().len();
    send_and_wait(
        &mut client_write,
        &mut replies,
        json!({"jsonrpc": "2.0", "id": 5, "method": "ping"}),
    )
    .await;
    let frames = buf.frames();
    assert_eq!(frames.len(), after_reset + 1);
    let last = frames.last().unwrap();
    assert_eq!(last["method"], json!("notifications/message"));
    assert_eq!(last["params"]["level"], json!("info"));
    assert_eq!(last["params"]["logger"], json!("system"));
    assert_eq!(last["params"]["data"]["msg"], json!("req"));
    assert_eq!(last["params"]["data"]["method"], json!("ping"));

    client_write.shutdown().await.unwrap();
    serve.await.unwrap();
}
