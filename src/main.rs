fn main() -> std::process::ExitCode {
    replaycast_lib::run()
}
