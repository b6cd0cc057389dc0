//! Interactive session.
//!
//! Reads one command per line from stdin, runs it through the reducer and
//! prints the resulting page. Requests are settled before the next line is
//! read, so output stays in input order.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use bbs_core::client::BoardClient;
use bbs_core::config::DisplayConfig;
use bbs_ui::Runtime;
use bbs_ui::commands::{self, Parsed};
use bbs_ui::render;
use chrono::Utc;

const PROMPT: &str = "bbs> ";

pub async fn run(client: BoardClient, display: &DisplayConfig) -> Result<()> {
    let mut runtime = Runtime::new(client);
    let interactive = io::stdin().is_terminal();

    print_page(&runtime, display);
    if interactive {
        println!("Type 'help' for commands.");
    }

    let mut line = String::new();
    loop {
        if interactive {
            print!("{PROMPT}");
            io::stdout().flush().context("flush stdout")?;
        }
        line.clear();
        if io::stdin().read_line(&mut line).context("read command")? == 0 {
            break;
        }

        match commands::parse(&line, runtime.state()) {
            Ok(Parsed::Nothing) => {}
            Ok(Parsed::Help) => println!("{}", commands::help()),
            Ok(Parsed::Event(event)) => {
                runtime.dispatch(event);
                runtime.settle().await;
                if runtime.state().should_quit {
                    break;
                }
                print_page(&runtime, display);
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

fn print_page(runtime: &Runtime, display: &DisplayConfig) {
    let page = render::render_page(runtime.state(), runtime.client().store(), display, Utc::now());
    println!("{page}\n");
}
