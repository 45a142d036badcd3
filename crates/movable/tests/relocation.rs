//! Placement resolution and topology round-trip coverage.

use anyhow::Result;
use movable::{Action, Position};

mod common;
use common::Fixture;

#[test]
fn symbolic_actions_round_trip() -> Result<()> {
    for to in ["start", "end", "before", "after", "replace", "swap"] {
        let mut fixture = Fixture::manual(to);
        let resting = fixture.snapshot();

        fixture
            .registry
            .relocate(&mut fixture.doc, fixture.subject)?;
        assert!(fixture.registry.is_moved(fixture.subject), "{to}: not moved");
        assert_ne!(resting, fixture.snapshot(), "{to}: tree did not change");

        fixture
            .registry
            .restore(&mut fixture.doc, fixture.subject)?;
        assert!(!fixture.registry.is_moved(fixture.subject));
        assert_eq!(
            resting,
            fixture.snapshot(),
            "{to}: restore did not reproduce the resting tree"
        );
    }
    Ok(())
}

#[test]
fn start_and_end_place_at_edges() -> Result<()> {
    let mut fixture = Fixture::manual("start");
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.children(fixture.menu).first(),
        Some(&fixture.subject)
    );

    let mut fixture = Fixture::manual("end");
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.children(fixture.menu).last(),
        Some(&fixture.subject)
    );
    Ok(())
}

#[test]
fn before_and_after_flank_the_target() -> Result<()> {
    let mut fixture = Fixture::manual("before");
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.previous_element_sibling(fixture.menu),
        Some(fixture.subject)
    );

    let mut fixture = Fixture::manual("after");
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.next_element_sibling(fixture.menu),
        Some(fixture.subject)
    );
    Ok(())
}

#[test]
fn replace_takes_the_targets_spot_and_detaches_it() -> Result<()> {
    let mut fixture = Fixture::manual("replace");
    let content = fixture.doc.parent(fixture.menu);

    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(fixture.doc.parent(fixture.subject), content);
    assert_eq!(fixture.doc.parent(fixture.menu), None);

    fixture
        .registry
        .restore(&mut fixture.doc, fixture.subject)?;
    assert_eq!(fixture.doc.parent(fixture.menu), content);
    assert_eq!(fixture.doc.parent(fixture.subject), Some(fixture.dock));
    Ok(())
}

#[test]
fn swap_exchanges_positions_exactly() -> Result<()> {
    let mut fixture = Fixture::manual("swap");
    let content = fixture.doc.parent(fixture.menu);
    let resting = fixture.snapshot();

    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(fixture.doc.parent(fixture.subject), content);
    assert_eq!(fixture.doc.parent(fixture.menu), Some(fixture.dock));

    fixture
        .registry
        .restore(&mut fixture.doc, fixture.subject)?;
    assert_eq!(resting, fixture.snapshot());
    Ok(())
}

#[test]
fn index_one_inserts_before_second_child() -> Result<()> {
    let mut fixture = Fixture::manual("1");
    assert_eq!(fixture.registry.action(fixture.subject), Some(Action::In));
    assert_eq!(
        fixture.registry.position(fixture.subject),
        Some(Position::Before)
    );

    let resting = fixture.snapshot();
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.children(fixture.menu),
        vec![
            fixture.items[0],
            fixture.subject,
            fixture.items[1],
            fixture.items[2]
        ]
    );

    fixture
        .registry
        .restore(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.children(fixture.menu),
        fixture.items.to_vec()
    );
    assert_eq!(resting, fixture.snapshot());
    Ok(())
}

#[test]
fn negative_index_inserts_after_counted_child() -> Result<()> {
    let mut fixture = Fixture::manual("-1");
    assert_eq!(fixture.registry.action(fixture.subject), Some(Action::In));
    assert_eq!(
        fixture.registry.position(fixture.subject),
        Some(Position::After)
    );

    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    assert_eq!(
        fixture.doc.children(fixture.menu).last(),
        Some(&fixture.subject)
    );
    Ok(())
}

#[test]
fn out_of_range_index_normalizes_to_edge() {
    let fixture = Fixture::manual("5");
    assert_eq!(fixture.registry.action(fixture.subject), Some(Action::End));

    let fixture = Fixture::manual("-9");
    assert_eq!(
        fixture.registry.action(fixture.subject),
        Some(Action::Start)
    );
}

#[test]
fn moved_sibling_subjects_are_filtered_from_index_resolution() -> Result<()> {
    let mut fixture = Fixture::manual("end");
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    // Subject is now the menu's last child and in the moved state.

    let second = fixture.doc.create_element("movable-element");
    fixture.doc.set_attribute(second, "target", "menu");
    fixture.doc.set_attribute(second, "to", "-1");
    fixture.doc.set_attribute(second, "manual", "");
    fixture
        .doc
        .append(fixture.dock, second)
        .expect("attach second subject");
    fixture
        .registry
        .connect(&mut fixture.doc, &mut fixture.hub, second)?;

    // The moved first subject must not count as a child, so -1 still
    // resolves to the last original item.
    assert_eq!(fixture.registry.action(second), Some(Action::In));
    fixture.registry.relocate(&mut fixture.doc, second)?;
    assert_eq!(
        fixture.doc.children(fixture.menu),
        vec![
            fixture.items[0],
            fixture.items[1],
            fixture.items[2],
            second,
            fixture.subject
        ]
    );
    Ok(())
}

#[test]
fn relocate_is_idempotent() -> Result<()> {
    let mut fixture = Fixture::manual("end");
    let rx = fixture.doc.subscribe_events();

    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;
    let after_first = fixture.snapshot();
    fixture
        .registry
        .relocate(&mut fixture.doc, fixture.subject)?;

    assert_eq!(after_first, fixture.snapshot());
    assert_eq!(
        common::drain_events(&rx),
        vec![
            movable::events::BEFORE_MOVE,
            movable::events::AFTER_MOVE
        ]
    );
    Ok(())
}

#[test]
fn restore_without_move_is_a_no_op() -> Result<()> {
    let mut fixture = Fixture::manual("end");
    let rx = fixture.doc.subscribe_events();
    let resting = fixture.snapshot();

    fixture
        .registry
        .restore(&mut fixture.doc, fixture.subject)?;
    assert_eq!(resting, fixture.snapshot());
    assert!(common::drain_events(&rx).is_empty());
    Ok(())
}
