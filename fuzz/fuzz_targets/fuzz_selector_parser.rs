#![no_main]

use trail_core::selector::{ElementDescriptor, Selector, SelectorList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 1024 {
        return;
    }

    // Parsing must never panic.
    let Ok(list) = SelectorList::parse(text) else {
        return;
    };

    // Display output must parse back to the same list.
    let rendered = list.to_string();
    let reparsed = SelectorList::parse(&rendered).expect("canonical form must parse");
    assert_eq!(reparsed.to_string(), rendered, "canonical form must be stable");

    // Matching must never panic, and a list matches iff one of its selectors does.
    let element = ElementDescriptor::new("a")
        .with_class("btn")
        .with_attribute("role", "button")
        .with_parent(ElementDescriptor::new("nav"));
    let any = list.iter().any(|s: &Selector| s.matches(&element));
    assert_eq!(list.matches(&element), any);
});
