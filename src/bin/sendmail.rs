use std::process::ExitCode;

use clap::Parser;
use mail_notify::{finish, finish_usage, init_logging, run_sendmail, SendmailCli};

/// Fixed-recipient notifier: `sendmail <subject> [body]`
fn main() -> ExitCode {
    let cli = match SendmailCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return finish_usage(e),
    };
    if let Err(e) = init_logging(cli.common.log_level.into(), cli.common.log_file.as_deref()) {
        eprintln!("Logging disabled: {e:?}");
    }
    finish(run_sendmail(cli))
}
