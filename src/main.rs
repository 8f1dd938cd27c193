fn main() {
    let cli = kconfig_graph::cli::parse();
    kconfig_graph::app::init_logging(cli.quiet, cli.verbose);
    let code = kconfig_graph::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
