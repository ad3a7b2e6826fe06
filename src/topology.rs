use crate::error::{Error, Result};

pub const EAST: usize = 0;
pub const SOUTH: usize = 1;
pub const WEST: usize = 2;
pub const NORTH: usize = 3;

/// Periodic L×L square lattice with a precomputed neighbor table.
///
/// Sites are indexed row-major: `site = row * width + col`. Element
/// `neighbors[site * 4 + d]` is the neighbor of `site` in direction `d`
/// (east, south, west, north), with wraparound so the lattice is a torus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    width: usize,
    size: usize,
    neighbors: Vec<u32>,
}

impl Topology {
    /// Build the neighbor table for a `width × width` torus.
    pub fn build(width: usize) -> Result<Self> {
        if width < 1 {
            return Err(Error::config("lattice width must be >= 1"));
        }
        let size = width
            .checked_mul(width)
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(|| Error::config(format!("lattice width {width} is too large")))?;

        let mut neighbors = vec![0u32; size * 4];
        for site in 0..size {
            let row = site / width;
            let col = site % width;
            let base = site * 4;
            neighbors[base + EAST] = (row * width + (col + 1) % width) as u32;
            neighbors[base + SOUTH] = ((site + width) % size) as u32;
            neighbors[base + WEST] = (row * width + (col + width - 1) % width) as u32;
            neighbors[base + NORTH] = ((site + size - width) % size) as u32;
        }

        Ok(Self {
            width,
            size,
            neighbors,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of sites, `width²`.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The four neighbors of `site` as (east, south, west, north).
    #[inline(always)]
    pub fn neighbors(&self, site: usize) -> [usize; 4] {
        let n = &self.neighbors[site * 4..site * 4 + 4];
        [n[0] as usize, n[1] as usize, n[2] as usize, n[3] as usize]
    }

    #[inline(always)]
    pub fn neighbor(&self, site: usize, direction: usize) -> usize {
        self.neighbors[site * 4 + direction] as usize
    }

    #[inline(always)]
    pub fn east(&self, site: usize) -> usize {
        self.neighbor(site, EAST)
    }

    #[inline(always)]
    pub fn south(&self, site: usize) -> usize {
        self.neighbor(site, SOUTH)
    }

    #[inline(always)]
    pub fn west(&self, site: usize) -> usize {
        self.neighbor(site, WEST)
    }

    #[inline(always)]
    pub fn north(&self, site: usize) -> usize {
        self.neighbor(site, NORTH)
    }

    /// `(row, col)` of a linear site index.
    #[inline]
    pub fn coords(&self, site: usize) -> (usize, usize) {
        (site / self.width, site % self.width)
    }

    #[inline]
    pub fn site(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Checkerboard color, `(row + col) mod 2`.
    #[inline]
    pub fn color(&self, site: usize) -> usize {
        let (row, col) = self.coords(site);
        (row + col) & 1
    }

    /// Two colors separate all neighbors only when the width is even.
    pub fn is_bipartite(&self) -> bool {
        self.width % 2 == 0
    }
}
