fn main() {
    if let Err(err) = outline_mindmap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
