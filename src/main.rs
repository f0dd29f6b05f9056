fn main() {
    if let Err(err) = floorclock_lib::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
