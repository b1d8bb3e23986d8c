//! Saving weights as a flat dump and loading them back.

use nlayer::data::{load_weights, save_weights};
use nlayer::feedforward::{Case, CaseSet, Net, StopCriteria, Topology, Weights};
use nlayer::Error;
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn trained_weights_survive_a_round_trip() {
    let topology = Topology::new(&[3, 5, 4, 2]).unwrap();
    let weights = Weights::random(&topology, -2.0, 2.0, &mut StdRng::seed_from_u64(9));
    let cases = CaseSet::new(
        &topology,
        vec![
            Case::new(vec![0.1, 0.2, 0.3], vec![1.0, 0.0]),
            Case::new(vec![0.9, 0.1, 0.4], vec![0.0, 1.0]),
        ],
    )
    .unwrap();

    let mut trainer = Net::new(topology.clone(), weights).unwrap().build_trainer(0.3);
    trainer.train_until(&cases, &StopCriteria::new(20, 0.0)).unwrap();
    let mut net = trainer.teardown();
    let outputs = net.run_batch(&cases).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.txt");
    save_weights(&path, net.weights()).unwrap();

    let loaded = load_weights(&path, &topology).unwrap();
    assert_eq!(&loaded, net.weights());

    let mut reloaded = Net::new(topology, loaded).unwrap();
    assert_eq!(reloaded.run_batch(&cases).unwrap(), outputs);
}

#[test]
fn dump_has_one_block_per_layer() {
    let topology = Topology::new(&[2, 3, 1]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.txt");
    save_weights(&path, &Weights::filled(&topology, 0.5)).unwrap();

    let dump = std::fs::read_to_string(&path).unwrap();
    let blocks: Vec<&str> = dump.split("\n\n").filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].lines().count(), 2);
    assert_eq!(blocks[1].lines().count(), 3);
    assert_eq!(blocks[0].lines().next().unwrap().split_whitespace().count(), 3);
}

#[test]
fn loading_for_another_topology_fails() {
    let topology = Topology::new(&[2, 3, 1]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.txt");
    save_weights(&path, &Weights::filled(&topology, 0.5)).unwrap();

    let other = Topology::new(&[2, 2, 1]).unwrap();
    assert!(matches!(
        load_weights(&path, &other),
        Err(Error::Weights { .. })
    ));
}
