use std::io::{self, Write};

use log::warn;
use racetrack_core::{Direction, MoveStrategy, StrategyKind};

/// Line-by-line input shared by every interactive car.
pub(crate) trait LineSource {
    /// Appends the next line to `line`, returning the number of bytes read.
    fn next_line(&mut self, line: &mut String) -> io::Result<usize>;
}

impl LineSource for io::Stdin {
    fn next_line(&mut self, line: &mut String) -> io::Result<usize> {
        self.read_line(line)
    }
}

/// Planner that asks a person for every move.
pub(crate) struct UserMove<R, W> {
    id: char,
    input: R,
    output: W,
    closed: bool,
}

impl UserMove<io::Stdin, io::Stdout> {
    /// Reads moves from standard input.
    pub(crate) fn stdio(id: char) -> Self {
        Self::new(id, io::stdin(), io::stdout())
    }
}

impl<R: LineSource, W: Write> UserMove<R, W> {
    pub(crate) fn new(id: char, input: R, output: W) -> Self {
        Self {
            id,
            input,
            output,
            closed: false,
        }
    }

    fn prompt(&mut self, message: &str) {
        let _ = write!(self.output, "{message}");
        let _ = self.output.flush();
    }

    /// Reads lines until one names a direction. `None` once input is exhausted.
    fn read_direction(&mut self) -> Option<Direction> {
        let mut line = String::new();
        loop {
            let prompt = format!("car {} move (1-9 or direction name): ", self.id);
            self.prompt(&prompt);
            line.clear();
            match self.input.next_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(error) => {
                    warn!("failed to read a move for car {}: {error}", self.id);
                    return None;
                }
            }
            if let Some(direction) = parse_move(line.trim()) {
                return Some(direction);
            }
            let retry = format!("`{}` is not a move\n", line.trim());
            self.prompt(&retry);
        }
    }
}

/// Accepts a keypad digit or a direction name in any case.
fn parse_move(text: &str) -> Option<Direction> {
    if let Ok(digit) = text.parse::<usize>() {
        return digit
            .checked_sub(1)
            .and_then(|index| Direction::ALL.get(index))
            .copied();
    }
    text.to_ascii_uppercase().parse().ok()
}

impl<R: LineSource, W: Write> MoveStrategy for UserMove<R, W> {
    fn next_move(&mut self) -> Direction {
        if self.closed {
            return Direction::None;
        }
        match self.read_direction() {
            Some(direction) => direction,
            None => {
                self.closed = true;
                Direction::None
            }
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::User
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_move, LineSource, UserMove};
    use racetrack_core::{Direction, MoveStrategy, StrategyKind};
    use std::io::{self, BufRead};

    impl LineSource for &[u8] {
        fn next_line(&mut self, line: &mut String) -> io::Result<usize> {
            self.read_line(line)
        }
    }

    #[test]
    fn keypad_digits_follow_direction_order() {
        assert_eq!(parse_move("1"), Some(Direction::DownLeft));
        assert_eq!(parse_move("5"), Some(Direction::None));
        assert_eq!(parse_move("9"), Some(Direction::UpRight));
        assert_eq!(parse_move("0"), None);
        assert_eq!(parse_move("10"), None);
    }

    #[test]
    fn direction_names_ignore_case() {
        assert_eq!(parse_move("up_left"), Some(Direction::UpLeft));
        assert_eq!(parse_move("RIGHT"), Some(Direction::Right));
        assert_eq!(parse_move("sideways"), None);
    }

    #[test]
    fn reprompts_until_a_valid_move() {
        let input: &[u8] = b"warp\n\n7\nleft\n";
        let mut output = Vec::new();
        let mut user = UserMove::new('a', input, &mut output);
        assert_eq!(user.kind(), StrategyKind::User);
        assert_eq!(user.next_move(), Direction::UpLeft);
        assert_eq!(user.next_move(), Direction::Left);
        assert_eq!(user.next_move(), Direction::None);
        assert_eq!(user.next_move(), Direction::None);
        drop(user);

        let transcript = String::from_utf8(output).expect("utf-8 prompts");
        assert!(transcript.contains("`warp` is not a move"));
        assert!(transcript.starts_with("car a move"));
    }
}
