//! Integration tests for ossmirror

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::path::{Path, PathBuf};
    use std::thread;
    use tempfile::TempDir;

    fn ossmirror() -> Command {
        let mut cmd = cargo_bin_cmd!("ossmirror");
        cmd.env_remove("OSSMIRROR_URL")
            .env_remove("OSSMIRROR_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn write_config(dir: &TempDir, workspace: &Path) -> PathBuf {
        let path = dir.path().join("config.json");
        let config = serde_json::json!({
            "workspace": workspace,
            "oss_public_url": "https://mirror.example.com",
            "oss_endpoint": "http://127.0.0.1:1",
            "oss_access_key_id": "id",
            "oss_access_key_secret": "secret",
            "oss_bucket": "mirror",
        });
        std::fs::write(&path, config.to_string()).unwrap();
        path
    }

    /// Serve a single 404 on a random local port
    fn serve_not_found() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });

        format!("http://{}/files/report.pdf", addr)
    }

    #[test]
    fn help_displays() {
        ossmirror()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Mirror a remote file"));
    }

    #[test]
    fn version_displays() {
        ossmirror()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ossmirror"));
    }

    #[test]
    fn missing_url_fails() {
        ossmirror()
            .args(["-c", "/nonexistent/config.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid url"));
    }

    #[test]
    fn blank_url_fails_before_reading_config() {
        ossmirror()
            .args(["-c", "/nonexistent/config.json", "-l", "   "])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("input stage"))
            .stderr(predicate::str::contains("config stage").not());
    }

    #[test]
    fn missing_config_fails() {
        ossmirror()
            .args(["-c", "/nonexistent/config.json", "-l", "http://a.com/x"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("config stage"));
    }

    #[test]
    fn not_found_leaves_no_file_behind() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("workspace");
        std::fs::create_dir(&workspace).unwrap();
        let config = write_config(&dir, &workspace);

        ossmirror()
            .arg("-c")
            .arg(&config)
            .args(["-l", &serve_not_found()])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("bad code: 404"));

        assert!(!workspace.join("report.pdf").exists());
    }

    #[test]
    fn cached_file_survives_failed_publish() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("workspace");
        std::fs::create_dir(&workspace).unwrap();
        std::fs::write(workspace.join("report.pdf"), b"cached").unwrap();
        let config = write_config(&dir, &workspace);

        // The store endpoint refuses connections, so publishing fails
        ossmirror()
            .arg("-c")
            .arg(&config)
            .args(["-l", "http://127.0.0.1:1/files/report.pdf"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("publish stage"));

        assert_eq!(
            std::fs::read(workspace.join("report.pdf")).unwrap(),
            b"cached"
        );
    }
}
