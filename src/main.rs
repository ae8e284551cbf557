fn main() {
    std::process::exit(repofuncs::app::startup::startup());
}
