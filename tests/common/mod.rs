use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Configuration YAML with every upstream pointed at `base`
#[allow(dead_code)]
pub fn config_yaml(base: &str) -> String {
    format!(
        "server:\n  host: 127.0.0.1\n  port: 8080\n  ip_lookup_url: {base}/ip\n\
relay:\n  base_url: {base}\n  timeout_seconds: 5\n\
services:\n  youtube:\n    api_key: yt-key\n    oembed_url: {base}/oembed\n    search_url: {base}/search\n    videos_url: {base}/videos\n    thumbnail_url: {base}/vi/{{id}}/maxresdefault.jpg\n\
\x20 dictionary:\n    define_url: {base}/define\n\
\x20 insult:\n    url: {base}/insult\n\
\x20 hastebin:\n    base_url: {base}\n\
\x20 osu:\n    api_key: osu-key\n    user_url: {base}/get_user\n",
        base = base
    )
}

/// Relay reply body carrying one record
#[allow(dead_code)]
pub fn relay_reply(answer: &str, token: &str) -> Vec<u8> {
    format!("{}\r{}\r\r\r\r\r\r", answer, token).into_bytes()
}
