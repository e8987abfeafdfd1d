use tourney_engine::life::*;

#[test]
fn damage_floors_at_zero_and_flags_knockout() {
    let mut h = Health::new(10);
    let taken = apply_damage(&mut h, 25);
    assert_eq!(taken.before, 10);
    assert_eq!(taken.after, 0);
    assert!(taken.knocked_out);
    assert_eq!(h.hp, 0);
    assert!(!h.is_up());
}

#[test]
fn partial_damage_is_not_a_knockout() {
    let mut h = Health::new(10);
    let taken = apply_damage(&mut h, 4);
    assert_eq!(h.hp, 6);
    assert!(!taken.knocked_out);
    assert!(h.is_up());
}

#[test]
fn hitting_a_downed_member_reports_no_new_knockout() {
    let mut h = Health { hp: 0, max_hp: 10 };
    let taken = apply_damage(&mut h, 3);
    assert_eq!(h.hp, 0);
    assert!(!taken.knocked_out);
}

#[test]
fn restore_full_returns_to_base() {
    let mut h = Health { hp: 0, max_hp: 12 };
    restore_full(&mut h);
    assert_eq!(h.hp, 12);
    assert!(h.is_full());
}
