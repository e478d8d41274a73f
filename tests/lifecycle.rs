use logmanager::{LogManager, dispatch};
mod common;

#[test]
fn test_default_file_in_working_directory() {
    let _serial = common::serial();
    let dir = tempfile::tempdir().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let manager = LogManager::create().unwrap();
    std::env::set_current_dir(previous).unwrap();

    let expected = dir.path().canonicalize().unwrap().join("log.log");
    let actual = manager.current_file_path().unwrap().canonicalize().unwrap();
    assert_eq!(actual, expected);
    dispatch::info_msg(None, 0, "main", "hello");
    manager.destroy();
    assert!(std::fs::read_to_string(&expected).unwrap().ends_with("INFO : hello\n"));
}

#[test]
fn test_reinstall_after_destroy() {
    let _serial = common::serial();
    for _ in 0..3 {
        let manager = logmanager::manager_config().no_file().install().unwrap();
        assert!(LogManager::is_installed());
        assert_eq!(manager.current_file_path(), None);
        drop(manager);
        assert!(!LogManager::is_installed());
    }
}

#[test]
#[should_panic(expected = "no log manager is installed")]
fn test_stale_hook_fails_fast() {
    let _serial = common::serial();
    let manager = logmanager::manager_config().no_file().install().unwrap();
    let hooks = dispatch::current_hooks();
    manager.destroy();
    (hooks.error_msg)(None, 0, "f", "after destroy");
}
