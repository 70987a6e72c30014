use recado_core::Network;
use recado_db::Database;
use recado_types::snapshot::Snapshot;

fn populated() -> Network {
    let mut net = Network::new();
    for (login, name) in [("maria", "Maria"), ("joao", "Joao"), ("ana", "Ana")] {
        net.create_user(login, "$argon2id$fake", name).unwrap();
    }
    net.edit_profile("maria", "cidade", "Maceio").unwrap();
    net.edit_profile("maria", "idade", "30").unwrap();
    net.request_friend("ana", "maria").unwrap();
    net.request_friend("joao", "maria").unwrap();
    net.request_friend("maria", "joao").unwrap();
    net.add_idol("ana", "joao").unwrap();
    net.add_crush("ana", "maria").unwrap();
    net.add_crush("maria", "ana").unwrap();
    net.add_enemy("ana", "joao").unwrap();
    net.create_community("maria", "ufal", "Universidade").unwrap();
    net.join_community("ana", "ufal").unwrap();
    net.send_community_message("ana", "ufal", "ola").unwrap();
    net.send_recado("maria", "joao", "primeiro").unwrap();
    net.send_recado("ana", "joao", "segundo").unwrap();
    net
}

#[test]
fn empty_database_loads_empty_snapshot() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.load().unwrap(), Snapshot::default());
}

#[test]
fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recado.db");
    let snapshot = populated().snapshot();

    {
        let db = Database::open(&path).unwrap();
        db.save(&snapshot).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let loaded = db.load().unwrap();
    assert_eq!(loaded, snapshot);

    let mut net = Network::restore(loaded);
    assert_eq!(net.read_recado("joao").unwrap(), "maria: primeiro");
    assert_eq!(net.read_recado("joao").unwrap(), "ana: segundo");
    assert_eq!(net.friends("maria").unwrap(), ["joao"]);
    assert_eq!(
        net.community("ufal").unwrap().members.iter().collect::<Vec<_>>(),
        ["maria", "ana"]
    );
}

#[test]
fn save_replaces_previous_state() {
    let db = Database::open_in_memory().unwrap();
    let mut net = populated();
    db.save(&net.snapshot()).unwrap();

    net.remove_user("maria");
    db.save(&net.snapshot()).unwrap();

    let loaded = db.load().unwrap();
    assert_eq!(loaded, net.snapshot());
    assert!(loaded.communities.is_empty());
    assert!(loaded.users.iter().all(|u| u.profile.login != "maria"));
}

#[test]
fn clear_wipes_everything() {
    let db = Database::open_in_memory().unwrap();
    db.save(&populated().snapshot()).unwrap();
    db.clear().unwrap();
    assert!(db.load().unwrap().is_empty());
}
