//! Property tests for command validation and table rendering.

mod common;

use proptest::prelude::*;

use common::table_cells;
use zlma_web::commands::{CommandSpec, VIF_COMMANDS};
use zlma_web::table::render;
use zlma_web::types::ValidationError;

fn known_command() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VIF_COMMANDS.iter().map(|(cmd, _)| *cmd).collect::<Vec<_>>())
}

fn known_pair() -> impl Strategy<Value = (&'static str, &'static str)> {
    let pairs: Vec<(&'static str, &'static str)> = VIF_COMMANDS
        .iter()
        .flat_map(|(cmd, subs)| subs.iter().map(move |sub| (*cmd, *sub)))
        .collect();
    prop::sample::select(pairs)
}

/// Cell text the renderer's markup cannot be confused with.
fn cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._%:/-]{0,12}"
}

proptest! {
    #[test]
    fn unknown_command_always_rejected(cmd in ".{0,16}", sub_cmd in ".{0,16}") {
        let spec = CommandSpec::vif();
        prop_assume!(spec.subcommands(&cmd).is_none());
        let rejected = matches!(
            spec.validate(&cmd, &sub_cmd),
            Err(ValidationError::UnknownCommand { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn unlisted_subcommand_rejected(cmd in known_command(), sub_cmd in ".{1,16}") {
        let spec = CommandSpec::vif();
        prop_assume!(!spec.subcommands(cmd).unwrap().any(|s| s == sub_cmd));
        let rejected = matches!(
            spec.validate(cmd, &sub_cmd),
            Err(ValidationError::UnknownSubcommand { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn bare_known_command_accepted(cmd in known_command()) {
        let validated = CommandSpec::vif().validate(cmd, "").unwrap();
        prop_assert_eq!(validated.args(), vec![cmd.to_string()]);
    }

    #[test]
    fn listed_pair_accepted((cmd, sub_cmd) in known_pair()) {
        let validated = CommandSpec::vif().validate(cmd, sub_cmd).unwrap();
        prop_assert_eq!(validated.args(), vec![cmd.to_string(), sub_cmd.to_string()]);
    }

    #[test]
    fn table_round_trips_rows_exactly(
        headers in prop::collection::vec(cell(), 1..6),
        rows in prop::collection::vec(prop::collection::vec(cell(), 0..8), 0..10),
    ) {
        let html = render(&headers, &rows);
        prop_assert_eq!(html.matches("<th>").count(), headers.len());
        prop_assert_eq!(table_cells(&html), rows);
    }
}
