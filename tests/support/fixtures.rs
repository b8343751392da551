//! Archive builders and release API mocks shared by integration tests.

use std::io::{Cursor, Write};

use serde_json::{Value, json};
use tar::{Builder, EntryType, Header};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xz2::write::XzEncoder;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const OWNER: &str = "openslide";
pub const REPO: &str = "openslide-bin";

/// A `.tar.xz` holding regular files and `(link, target)` symlinks.
pub fn tar_xz_bytes(files: &[(&str, &[u8])], symlinks: &[(&str, &str)]) -> Vec<u8> {
    let encoder = XzEncoder::new(Vec::new(), 6);
    let mut builder = Builder::new(encoder);
    for (name, data) in files {
        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar file");
    }
    for (link, target) in symlinks {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        builder
            .append_link(&mut header, link, target)
            .expect("append tar symlink");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish xz")
}

/// A `.zip` holding regular files.
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

pub fn release_json(id: u64, tag: &str) -> Value {
    json!({ "id": id, "tag_name": tag, "name": format!("OpenSlide {tag}") })
}

pub fn asset_json(server: &MockServer, name: &str, size: usize) -> Value {
    json!({
        "name": name,
        "browser_download_url": format!("{}/download/{name}", server.uri()),
        "size": size,
    })
}

/// Serves `releases` as page `page` of the release list.
pub async fn mount_release_page(server: &MockServer, page: u32, releases: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/releases")))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(releases)))
        .mount(server)
        .await;
}

/// Serves `assets` as the single asset page of release `release_id`.
pub async fn mount_assets(server: &MockServer, release_id: u64, assets: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/releases/{release_id}/assets"
        )))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(assets)))
        .mount(server)
        .await;
}

/// Serves `body` at the download URL built by [`asset_json`].
pub async fn mount_download(server: &MockServer, name: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Mounts a release `tag` (id 7) with a Linux tarball and a Windows zip.
///
/// Returns the library bytes stored in each archive.
pub async fn mount_standard_release(server: &MockServer, tag: &str) -> (Vec<u8>, Vec<u8>) {
    let so_bytes = b"\x7fELF fake shared object".to_vec();
    let dll_bytes = b"MZ fake dll".to_vec();

    let tarball = tar_xz_bytes(
        &[
            ("openslide-bin-linux-x86_64/lib/libopenslide.so.1", so_bytes.as_slice()),
            ("openslide-bin-linux-x86_64/README.md", &b"readme"[..]),
        ],
        &[("openslide-bin-linux-x86_64/lib/libopenslide.so", "libopenslide.so.1")],
    );
    let zipball = zip_bytes(&[
        ("openslide-bin-windows-x64/bin/libopenslide-1.dll", dll_bytes.as_slice()),
        ("openslide-bin-windows-x64/bin/openslide-show-properties.exe", &b"MZ exe"[..]),
    ]);

    let tar_name = format!("openslide-bin-{}-linux-x86_64.tar.xz", tag.trim_start_matches('v'));
    let zip_name = format!("openslide-bin-{}-windows-x64.zip", tag.trim_start_matches('v'));

    mount_release_page(server, 1, vec![release_json(7, tag)]).await;
    mount_assets(
        server,
        7,
        vec![
            asset_json(server, &tar_name, tarball.len()),
            asset_json(server, &zip_name, zipball.len()),
            asset_json(server, "SHA256SUMS", 64),
        ],
    )
    .await;
    mount_download(server, &tar_name, tarball).await;
    mount_download(server, &zip_name, zipball).await;

    (so_bytes, dll_bytes)
}
