use crate::Coords;
use crate::snake::Snake;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

/// Row-major snapshot of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i16,
    cells: Vec<Cell>,
}

impl Grid {
    #[cfg(test)]
    pub fn get(&self, pos: Coords) -> Option<Cell> {
        if pos.0 < 0 || pos.1 < 0 || pos.0 >= self.size || pos.1 >= self.size {
            return None;
        }
        self.cells.get(self.size as usize * pos.1 as usize + pos.0 as usize).copied()
    }

    /// Cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (((i as i16) % size, (i as i16) / size), *cell))
    }
}

pub fn render(snake: &Snake, food: Coords, board_size: i16) -> Grid {
    let mut grid = Grid {
        size: board_size,
        cells: vec![Cell::Empty; board_size as usize * board_size as usize],
    };

    let mut put = |pos: Coords, cell: Cell| {
        if pos.0 >= 0 && pos.1 >= 0 && pos.0 < board_size && pos.1 < board_size {
            grid.cells[board_size as usize * pos.1 as usize + pos.0 as usize] = cell;
        }
    };

    // Later writes win: food < body < head
    put(food, Cell::Food);
    for pos in snake.body().iter().skip(1) {
        put(*pos, Cell::Body);
    }
    put(snake.head(), Cell::Head);

    grid
}
