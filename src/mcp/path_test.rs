use super::*;

#[test]
fn test_windows_to_wsl() {
    assert_eq!(
        normalize_arg(Convention::Wsl, r"C:\Users\test\server.js"),
        "/mnt/c/Users/test/server.js"
    );
    assert_eq!(
        normalize_arg(Convention::Wsl, r"d:\data\file.txt"),
        "/mnt/d/data/file.txt"
    );
}

#[test]
fn test_wsl_to_windows() {
    assert_eq!(
        normalize_arg(Convention::Windows, "/mnt/c/Users/test/server.js"),
        r"C:\Users\test\server.js"
    );
}

#[test]
fn test_non_path_args_untouched() {
    for convention in [Convention::Native, Convention::Wsl, Convention::Windows] {
        assert_eq!(normalize_arg(convention, "--port=8080"), "--port=8080");
        assert_eq!(normalize_arg(convention, "serve"), "serve");
        // Plain POSIX paths are not WSL mount paths
        assert_eq!(
            normalize_arg(convention, "/usr/local/bin/server"),
            "/usr/local/bin/server"
        );
    }
}

#[test]
fn test_native_passes_windows_paths_through() {
    assert_eq!(
        normalize_arg(Convention::Native, r"C:\Users\test"),
        r"C:\Users\test"
    );
}

#[test]
fn test_normalize_args_preserves_order() {
    let args = vec![
        "serve".to_string(),
        r"C:\srv\data".to_string(),
        "--verbose".to_string(),
    ];
    assert_eq!(
        normalize_args_for(Convention::Wsl, &args),
        vec!["serve", "/mnt/c/srv/data", "--verbose"]
    );
}
