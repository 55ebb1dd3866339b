fn main() {
    match backup_tool::cli::run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            println!("{:#}", err);
            std::process::exit(1);
        }
    }
}
