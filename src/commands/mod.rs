mod delete;
mod list;
mod menu;
mod visibility;

pub use delete::handle_delete;
pub use list::{handle_list, print_list};
pub use menu::{MenuAction, run_menu};
pub use visibility::handle_visibility;

use colored::Colorize;

use crate::executor::BatchAction;
use crate::format;
use crate::operations::FlowOutcome;

/// Print the final status of a flow.
pub fn report_outcome(action: BatchAction, outcome: &FlowOutcome) {
    match outcome {
        FlowOutcome::NoOp(reason) => println!("{}", reason.to_string().yellow()),
        FlowOutcome::Completed(result) => {
            let summary = format::format_summary(action, result);
            if result.failed() == 0 {
                println!("\n{}", summary.green());
            } else {
                println!("\n{}", summary.red());
                for (name, message) in result.failures() {
                    println!("  {} {}: {}", "✗".red(), name, message);
                }
            }
        }
    }
}
