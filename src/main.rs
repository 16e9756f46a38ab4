mod assets;
mod cli;
mod commands;
mod convert;
mod env_loader;
mod error;
mod logging;

fn main() {
    env_loader::load_dotenv();

    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            let kind = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<error::ConvertError>())
                .map(|cause| cause.kind().as_str())
                .unwrap_or("INTERNAL");
            logging::error("run_failed", &[("kind", kind)]);
            eprintln!("error: {err:#}");
            std::process::exit(error::exit_code_for(&err));
        }
    }
}
