use driftgrid::Backdrop;

fn main() {
    env_logger::init();

    if let Err(e) = Backdrop::new().run() {
        eprintln!("driftgrid exited with an error: {e}");
        std::process::exit(1);
    }
}
