use pretty_assertions::assert_eq;
use semproc::ProcessorOptions;
use semproc::script::{ScriptError, SymbolTable};

fn table() -> SymbolTable {
    SymbolTable::new(&ProcessorOptions::default())
}

#[test]
fn lookups_fall_back_to_specials() {
    let mut symbols = table();
    symbols.put_special("origin", "SFO").expect("room");
    symbols.put("trip.dest", "BOS").expect("room");

    assert_eq!(symbols.get("trip.dest"), Some("BOS"));
    assert_eq!(symbols.get("origin"), Some("SFO"));
    assert_eq!(symbols.get("trip.origin"), Some("SFO"));
    assert_eq!(symbols.get_special("trip.dest"), None);
    assert_eq!(symbols.len(), 1);
}

#[test]
fn qualified_special_wins_over_plain() {
    let mut symbols = table();
    symbols.put_special("origin", "SFO").expect("room");
    symbols.put_special("trip.origin", "OAK").expect("room");
    assert_eq!(symbols.get("trip.origin"), Some("OAK"));
    assert_eq!(symbols.get("city.origin"), Some("SFO"));
}

#[test]
fn reset_keeps_specials_and_reset_all_drops_them() {
    let mut symbols = table();
    symbols.put_special("origin", "SFO").expect("room");
    symbols.put("dest", "BOS").expect("room");

    symbols.reset();
    assert!(symbols.is_empty());
    assert_eq!(symbols.get("origin"), Some("SFO"));

    symbols.reset_all();
    assert_eq!(symbols.get("origin"), None);
}

#[test]
fn iteration_follows_first_assignment() {
    let mut symbols = table();
    for (key, value) in [("b", "1"), ("a", "2"), ("b", "3")] {
        symbols.put(key, value).expect("room");
    }
    let entries: Vec<(&str, &str)> = symbols.iter().collect();
    assert_eq!(entries, vec![("b", "3"), ("a", "2")]);
}

#[test]
fn capacity_counts_distinct_keys() {
    let mut symbols = SymbolTable::new(&ProcessorOptions {
        max_symbols: 2,
        ..ProcessorOptions::default()
    });
    symbols.put("a", "1").expect("room");
    symbols.put("b", "2").expect("room");
    symbols.put("a", "3").expect("overwrite needs no room");
    assert_eq!(
        symbols.put("c", "4"),
        Err(ScriptError::BufferOverflow {
            what: "symbol table",
            required: 3,
            limit: 2
        })
    );
}

#[test]
fn oversized_keys_and_values_are_refused() {
    let mut symbols = SymbolTable::new(&ProcessorOptions {
        max_key_len: 4,
        max_value_len: 3,
        ..ProcessorOptions::default()
    });
    assert_eq!(
        symbols.put("toolong", "x"),
        Err(ScriptError::BufferOverflow {
            what: "symbol key",
            required: 7,
            limit: 4
        })
    );
    assert_eq!(
        symbols.put_special("k", "abcd"),
        Err(ScriptError::BufferOverflow {
            what: "symbol value",
            required: 4,
            limit: 3
        })
    );
}
