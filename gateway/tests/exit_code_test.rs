//! Process-level tests for the gateway binary

use std::net::TcpListener;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[test]
fn test_bind_failure_exits_non_zero() {
    // Hold the port so the gateway cannot bind it
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = occupied.local_addr().unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_gateway"))
        .env("GATEWAY_ADDR", addr.to_string())
        .env("RUST_LOG", "gateway=info")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(20);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("gateway kept running although {} was taken", addr);
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(!status.success(), "gateway exited with {}", status);

    let output = child.wait_with_output().unwrap();
    let logs = String::from_utf8_lossy(&output.stdout);
    assert!(
        logs.contains("Failed to bind"),
        "bind error not logged: {}",
        logs
    );

    drop(occupied);
}

#[test]
fn test_invalid_prefix_exits_non_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_gateway"))
        .env("GATEWAY_ADDR", "127.0.0.1:0")
        .env("GATEWAY_API_PREFIX", "api/")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let logs = String::from_utf8_lossy(&output.stdout);
    assert!(logs.contains("Invalid path prefix"), "{}", logs);
}

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_gateway"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GATEWAY_ADDR"));
    assert!(
        stdout.contains("(default: gateway=info,gateway_lib=info)"),
        "help should show the filter main installs: {stdout}"
    );
}
