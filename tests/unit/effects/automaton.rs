use super::*;

fn checker(w: u32, h: u32, cell: u32) -> Plane {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Plane::luma_of(&PixelBuffer::new(w, h, data).unwrap())
}

fn grid(cols: usize, rows: usize, alive: &[(usize, usize)]) -> CellGrid {
    let mut cells = vec![false; cols * rows];
    for &(c, r) in alive {
        cells[r * cols + c] = true;
    }
    CellGrid::from_cells(cols, rows, cells).unwrap()
}

#[test]
fn zero_steps_renders_the_threshold_grid() {
    let luma = checker(17, 9, 4);
    let params = AutomatonParams {
        steps: 0,
        ..Default::default()
    };
    let seeded = seed_grid(&luma, &params);
    assert_eq!((seeded.cols(), seeded.rows()), (5, 3));
    assert_eq!(simulate(&luma, &params), seeded);
    let direct = render_grid(&seeded, 17, 9, &params).unwrap();
    assert_eq!(render_automaton(&luma, &params).unwrap(), direct);
    // Top-left cell is black, so it starts alive and is drawn in fg.
    assert_eq!(direct.pixel(0, 0), Rgb::BLACK.to_rgba());
    assert_eq!(direct.pixel(4, 0), Rgb::WHITE.to_rgba());
}

#[test]
fn blinker_oscillates_with_classic_rules() {
    let params = AutomatonParams::default();
    let horizontal = grid(5, 5, &[(1, 2), (2, 2), (3, 2)]);
    let vertical = step(&horizontal, &params);
    assert_eq!(vertical, grid(5, 5, &[(2, 1), (2, 2), (2, 3)]));
    assert_eq!(step(&vertical, &params), horizontal);
}

#[test]
fn neighbors_wrap_toroidally() {
    let g = grid(4, 4, &[(3, 3), (0, 3), (3, 0)]);
    assert_eq!(g.neighbors(0, 0, 1), 3);
    assert_eq!(g.neighbors(0, 0, 2), 3);
}

#[test]
fn larger_than_life_counts_24_neighbors() {
    let all = CellGrid::from_cells(6, 6, vec![true; 36]).unwrap();
    assert_eq!(all.neighbors(2, 2, AutomatonKind::LargerThanLife.radius()), 24);
    assert_eq!(all.neighbors(2, 2, AutomatonKind::Classic.radius()), 8);
}

#[test]
fn population_stays_bounded_for_extreme_ranges() {
    let luma = checker(32, 32, 3);
    for (sl, su, bl, bu) in [(0, 0, 0, 0), (8, 8, 8, 8), (0, 8, 0, 8), (5, 1, 7, 2)] {
        for kind in [AutomatonKind::Classic, AutomatonKind::LargerThanLife] {
            let params = AutomatonParams {
                steps: 50,
                kind,
                survive_lower: sl,
                survive_upper: su,
                birth_lower: bl,
                birth_upper: bu,
                cell_size: 2,
                ..Default::default()
            };
            let g = simulate(&luma, &params);
            assert!(g.population() <= g.cols() * g.rows());
        }
    }
}

#[test]
fn inverted_ranges_kill_everything() {
    let params = AutomatonParams {
        survive_lower: 5,
        survive_upper: 1,
        birth_lower: 7,
        birth_upper: 2,
        ..Default::default()
    };
    let g = grid(4, 4, &[(0, 0), (1, 1), (2, 2)]);
    assert_eq!(step(&g, &params).population(), 0);
}

#[test]
fn simulation_is_deterministic() {
    let luma = checker(40, 30, 5);
    let params = AutomatonParams {
        steps: 10,
        ..Default::default()
    };
    assert_eq!(simulate(&luma, &params), simulate(&luma, &params));
}
