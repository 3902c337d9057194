fn main() {
    // App commands go through the ACL: only capabilities that list `allow-<command>` may call them.
    tauri_build::try_build(
        tauri_build::Attributes::new().app_manifest(
            tauri_build::AppManifest::new().commands(&["signal_send", "app_info_get"]),
        ),
    )
    .expect("failed to run tauri-build");
}
