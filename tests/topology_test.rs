use xy_sim::topology::{EAST, NORTH, SOUTH, WEST};
use xy_sim::{Error, Lattice, Topology};

#[test]
fn test_neighbors_in_bounds() {
    for width in 1..=9 {
        let topo = Topology::build(width).unwrap();
        assert_eq!(topo.size(), width * width);
        for site in 0..topo.size() {
            for n in topo.neighbors(site) {
                assert!(n < topo.size(), "L={width}: neighbor {n} of {site} out of range");
            }
        }
    }
}

#[test]
fn test_neighbors_distinct_from_three_up() {
    for width in 3..=9 {
        let topo = Topology::build(width).unwrap();
        for site in 0..topo.size() {
            let n = topo.neighbors(site);
            for a in 0..4 {
                assert_ne!(n[a], site, "L={width}: site {site} is its own neighbor");
                for b in a + 1..4 {
                    assert_ne!(n[a], n[b], "L={width}: repeated neighbor of {site}");
                }
            }
        }
    }
}

#[test]
fn test_opposite_directions_invert() {
    for width in 1..=9 {
        let topo = Topology::build(width).unwrap();
        for site in 0..topo.size() {
            assert_eq!(topo.west(topo.east(site)), site);
            assert_eq!(topo.east(topo.west(site)), site);
            assert_eq!(topo.north(topo.south(site)), site);
            assert_eq!(topo.south(topo.north(site)), site);
        }
    }
}

#[test]
fn test_direction_indices_match_accessors() {
    let topo = Topology::build(5).unwrap();
    for site in 0..topo.size() {
        assert_eq!(topo.neighbor(site, EAST), topo.east(site));
        assert_eq!(topo.neighbor(site, SOUTH), topo.south(site));
        assert_eq!(topo.neighbor(site, WEST), topo.west(site));
        assert_eq!(topo.neighbor(site, NORTH), topo.north(site));
    }
}

#[test]
fn test_row_major_wraparound() {
    let topo = Topology::build(4).unwrap();
    // last column wraps to the first, last row wraps to the first
    assert_eq!(topo.east(3), 0);
    assert_eq!(topo.south(12), 0);
    assert_eq!(topo.west(4), 7);
    assert_eq!(topo.north(1), 13);
    assert_eq!(topo.coords(6), (1, 2));
    assert_eq!(topo.site(3, 1), 13);
}

#[test]
fn test_degenerate_widths() {
    let one = Topology::build(1).unwrap();
    assert_eq!(one.neighbors(0), [0, 0, 0, 0]);

    let two = Topology::build(2).unwrap();
    for site in 0..4 {
        assert_eq!(two.east(site), two.west(site));
        assert_eq!(two.south(site), two.north(site));
    }
}

#[test]
fn test_zero_width_rejected() {
    assert!(matches!(Topology::build(0), Err(Error::InvalidConfiguration(_))));
    assert!(Lattice::new(0, 1.0, 0.0, 1).is_err());
}

#[test]
fn test_checkerboard_colors() {
    let even = Topology::build(6).unwrap();
    assert!(even.is_bipartite());
    for site in 0..even.size() {
        for n in even.neighbors(site) {
            assert_ne!(even.color(site), even.color(n), "same color across a bond");
        }
    }
    assert!(!Topology::build(5).unwrap().is_bipartite());
}
