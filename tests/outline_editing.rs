// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anthologize::graph::{ItemGraph, Lineage};
use anthologize::model::{Item, ItemId};
use anthologize::store::{load_graph, read_document, snapshot, write_document};
use anthologize::view::ViewState;

fn item(id: &str, text: &str) -> Item {
    Item::new(ItemId::new(id).expect("item id"), text)
}

fn outline_of(graph: &ItemGraph) -> Vec<(usize, String)> {
    let mut rows = Vec::new();
    let mut stack: Vec<Lineage> = Lineage::root()
        .children(graph)
        .into_iter()
        .rev()
        .collect();
    while let Some(position) = stack.pop() {
        let text = graph
            .item(position.node_id(graph))
            .expect("item")
            .text()
            .to_owned();
        rows.push((position.depth(), text));
        stack.extend(position.children(graph).into_iter().rev());
    }
    rows
}

fn temp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut path = env::temp_dir();
    path.push(format!(
        "anthologize-e2e-{}-{nanos}-{name}",
        std::process::id()
    ));
    path
}

#[test]
fn a_session_of_gestures_builds_the_expected_outline() {
    let mut graph = ItemGraph::new(item("root", "root"));
    let mut view = ViewState::new();

    // Type three entries: the first insert on the root creates a first
    // child, the following two land as younger siblings of the freshly
    // focused row.
    view.set_focus(Lineage::root());
    for (id, text) in [
        ("i:groceries", "groceries"),
        ("i:errands", "errands"),
        ("i:calls", "calls"),
    ] {
        view.insert_at_current_position(&mut graph, item(id, text), false)
            .expect("insert")
            .expect("created");
    }
    assert_eq!(
        outline_of(&graph),
        [
            (1, "groceries".to_owned()),
            (1, "errands".to_owned()),
            (1, "calls".to_owned()),
        ]
    );

    // Tab: "calls" nests under "errands"; enter: "bank" follows it there.
    view.indent(&mut graph).expect("indent").expect("moved");
    view.insert_at_current_position(&mut graph, item("i:bank", "bank"), false)
        .expect("insert")
        .expect("created");
    // Tab again: "bank" nests under "calls".
    view.indent(&mut graph).expect("indent").expect("moved");

    assert_eq!(
        outline_of(&graph),
        [
            (1, "groceries".to_owned()),
            (1, "errands".to_owned()),
            (2, "calls".to_owned()),
            (3, "bank".to_owned()),
        ]
    );

    // Shift-tab: "bank" surfaces directly after "calls".
    view.unindent(&mut graph).expect("unindent").expect("moved");
    assert_eq!(
        outline_of(&graph),
        [
            (1, "groceries".to_owned()),
            (1, "errands".to_owned()),
            (2, "calls".to_owned()),
            (2, "bank".to_owned()),
        ]
    );

    // Delete the focused row; focus falls back to the row above.
    let removed = view
        .remove_focused(&mut graph)
        .expect("remove")
        .expect("removed");
    assert_eq!(removed, vec![ItemId::new("i:bank").expect("item id")]);
    assert_eq!(
        view.focus()
            .map(|focus| focus.node_id(&graph).as_str()),
        Some("i:calls")
    );
    assert_eq!(
        outline_of(&graph),
        [
            (1, "groceries".to_owned()),
            (1, "errands".to_owned()),
            (2, "calls".to_owned()),
        ]
    );
}

#[test]
fn a_transcluded_entry_survives_deleting_one_of_its_parents() {
    let mut graph = ItemGraph::new(item("root", "root"));
    let root = Lineage::root();

    let projects = root
        .add_first_child(&mut graph, item("i:projects", "projects"))
        .expect("projects");
    let inbox = projects
        .add_younger_sibling(&mut graph, item("i:inbox", "inbox"))
        .expect("inbox");
    let task = projects
        .add_first_child(&mut graph, item("i:task", "write report"))
        .expect("task");

    // Show the task in the inbox as well.
    let task_id = task.node_id(&graph).clone();
    let inbox_id = inbox.node_id(&graph).clone();
    graph
        .place_child_id(&task_id, &inbox_id, None, None)
        .expect("transclude");

    let mut view = ViewState::new();
    view.set_focus(task.clone());
    view.kill(&mut graph, &projects).expect("kill projects");

    // The subtree under projects is gone, but the task lives on under inbox.
    assert!(graph.contains_item(&task_id));
    assert_eq!(
        outline_of(&graph),
        [
            (1, "inbox".to_owned()),
            (2, "write report".to_owned()),
        ]
    );
    // The focused position pointed into the killed subtree, so it was
    // dropped even though the item itself survived elsewhere.
    assert_eq!(view.focus(), None);
}

#[test]
fn an_edited_outline_round_trips_through_the_store() {
    let mut graph = ItemGraph::new(item("root", "root"));
    let mut view = ViewState::new();

    view.set_focus(Lineage::root());
    view.insert_at_current_position(&mut graph, item("i:one", "one"), false)
        .expect("insert")
        .expect("created");
    view.insert_at_current_position(&mut graph, item("i:two", "two"), false)
        .expect("insert")
        .expect("created");
    view.indent(&mut graph).expect("indent");

    let path = temp_file("roundtrip.json");
    let doc = snapshot(&graph, "someone@example.com");
    write_document(&path, &doc).expect("write");

    let reloaded = load_graph(&read_document(&path).expect("read")).expect("load");
    assert_eq!(outline_of(&reloaded), outline_of(&graph));
    let _ = std::fs::remove_file(&path);
}
