use logmanager::{MsgLevel, dispatch, manager_config};

fn main() {
    let manager = manager_config()
        .with_log_file("/tmp/logmanager_demo.log")
        .with_record_timestamp(true)
        .install()
        .expect("Unable to install log manager");
    log::info!("Hello, world!");

    let handles: Vec<_> = (0..5)
        .map(|i| {
            std::thread::spawn(move || {
                for j in 0..3 {
                    dispatch::warning_msg(Some(file!()), line!(), "worker", &format!("thread {i} says {j}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    manager.set_quiet(MsgLevel::Warning, true);
    log::warn!("nobody will see this");
    manager.set_file_line_quiet(false);
    log::error!("this one carries its file and line");

    manager.use_file_for_log("/tmp/logmanager_demo_2.log").ok();
    log::info!("written to the second file");
    drop(manager);

    for path in ["/tmp/logmanager_demo.log", "/tmp/logmanager_demo_2.log"] {
        println!("--- {path}\n{}", std::fs::read_to_string(path).unwrap());
    }
}
