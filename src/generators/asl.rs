// THEORY:
// Generates the AutoSplit-language script skeleton. The script is
// deliberately a stub: it lists every recognized mask so the user can
// reference them as `features["name"]`, and lays out the standard action
// blocks with a one-line hint each. Writing the actual split logic is the
// user's job, not this tool's.

const ACTIONS: &[(&str, &str)] = &[
    (
        "startup",
        "Setup initial settings like refresh rates or game-specific configurations.",
    ),
    (
        "shutdown",
        "Executed when closing VASL, suitable for cleanup and saving state.",
    ),
    (
        "init",
        "Initial logic, executed once before the update loop for setting initial variables.",
    ),
    ("exit", "Executed when the script exits, for post-timer actions."),
    (
        "update",
        "Continuous core logic of the script, executed first in each update cycle.",
    ),
    (
        "start",
        "Defines start conditions for the timer, including value resets.",
    ),
    (
        "split",
        "Triggers a split based on specific conditions, e.g., features[\"split-image\"].old > 90.",
    ),
    ("reset", "Conditions to reset the timer. Use cautiously."),
    (
        "isLoading",
        "Manages game time during load screens, e.g., return features[\"load-screen\"].current > 90",
    ),
    (
        "gameTime",
        "Handles complex or game-specific game time calculations.",
    ),
];

/// Renders the ASL script stub for the given final mask names.
pub fn create_asl(mask_names: &[&str]) -> String {
    let mut asl = String::from("// Generated by vas_architect\n\n// Recognised masks:\n");
    for name in mask_names {
        asl.push_str(&format!("// features[\"{name}\"]\n"));
    }

    for (action, hint) in ACTIONS {
        asl.push_str(&format!("\n{action}\n{{\n\t// {hint}\n}}\n"));
    }

    asl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mask_is_listed_exactly_once() {
        let asl = create_asl(&["Box", "Box_1", "Finish"]);
        for name in ["Box", "Box_1", "Finish"] {
            let needle = format!("// features[\"{name}\"]");
            assert_eq!(asl.matches(&needle).count(), 1, "missing {name}");
        }
    }

    #[test]
    fn all_action_blocks_are_present() {
        let asl = create_asl(&[]);
        for (action, _) in ACTIONS {
            assert!(
                asl.contains(&format!("\n{action}\n{{")),
                "missing action block {action}"
            );
        }
    }
}
