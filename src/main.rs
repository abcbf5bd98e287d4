fn main() {
    if let Err(err) = job_tracker::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
