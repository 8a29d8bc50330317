use anyhow::Result;
use lazypick::SelectorOutcome;
use serde_json::json;

/// Print the committed id, and its annotation on a second line.
pub(crate) fn print_plain(outcome: &SelectorOutcome) {
    if !outcome.accepted {
        println!("Selection cancelled (query: '{}')", outcome.query);
        return;
    }

    match &outcome.selection {
        Some(selection) => {
            println!("{}", selection.item.id);
            if let Some(annotation) = &selection.annotation {
                println!("{annotation}");
            }
        }
        None => println!("No selection"),
    }
}

pub(crate) fn format_outcome_json(outcome: &SelectorOutcome) -> Result<String> {
    let selection = match &outcome.selection {
        Some(selection) => json!({
            "id": selection.item.id,
            "label": selection.item.label,
            "annotation": selection.annotation,
        }),
        None => serde_json::Value::Null,
    };

    let payload = json!({
        "accepted": outcome.accepted,
        "query": outcome.query,
        "selection": selection,
    });

    Ok(serde_json::to_string_pretty(&payload)?)
}

pub(crate) fn print_json(outcome: &SelectorOutcome) -> Result<()> {
    println!("{}", format_outcome_json(outcome)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use lazypick::CommitSelection;
    use lazypick_source_api::ResultItem;
    use serde_json::Value;

    use super::*;

    #[test]
    fn json_includes_selection_and_annotation() {
        let outcome = SelectorOutcome {
            accepted: true,
            query: "cat".into(),
            selection: Some(CommitSelection {
                item: ResultItem::new("img/cat.png", "img/cat.png"),
                annotation: Some("nice".into()),
            }),
        };

        let json = format_outcome_json(&outcome).expect("json");
        let value: Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["accepted"], true);
        assert_eq!(value["selection"]["id"], "img/cat.png");
        assert_eq!(value["selection"]["annotation"], "nice");
    }

    #[test]
    fn cancelled_outcome_has_null_selection() {
        let outcome = SelectorOutcome {
            accepted: false,
            query: "dog".into(),
            selection: None,
        };

        let value: Value =
            serde_json::from_str(&format_outcome_json(&outcome).expect("json")).expect("parse");
        assert_eq!(value["accepted"], false);
        assert_eq!(value["query"], "dog");
        assert!(value["selection"].is_null());
    }
}
