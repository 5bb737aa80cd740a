use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use racetrack_core::{DoNotMove, MoveStrategy, SpaceType};
use racetrack_system_move_list::MoveList;
use racetrack_system_path_finder::{PathFinder, Search};
use racetrack_system_path_follower::{PathFollower, Waypoints};
use racetrack_world::{query, World};

use crate::{
    config::{Config, FileKind},
    console::UserMove,
};

/// Planner requested for one car on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StrategyChoice {
    User,
    DoNotMove,
    PathFinder,
    MoveList(PathBuf),
    PathFollower(PathBuf),
}

impl FromStr for StrategyChoice {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (name, argument) = match value.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (value, None),
        };
        let choice = match (name, argument) {
            ("user", None) => Self::User,
            ("do-not-move", None) => Self::DoNotMove,
            ("path-finder", None) => Self::PathFinder,
            ("move-list", Some(file)) if !file.is_empty() => Self::MoveList(PathBuf::from(file)),
            ("path-follower", Some(file)) if !file.is_empty() => {
                Self::PathFollower(PathBuf::from(file))
            }
            ("move-list" | "path-follower", _) => {
                bail!("strategy `{name}` needs a file, as in `{name}:FILE`")
            }
            ("user" | "do-not-move" | "path-finder", Some(_)) => {
                bail!("strategy `{name}` takes no file")
            }
            _ => bail!(
                "unknown strategy `{name}`, expected one of user, do-not-move, path-finder, \
                 move-list:FILE or path-follower:FILE"
            ),
        };
        Ok(choice)
    }
}

/// `ID=STRATEGY` pair given through `--car`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CarAssignment {
    id: char,
    strategy: StrategyChoice,
}

impl FromStr for CarAssignment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (id, strategy) = value
            .split_once('=')
            .ok_or_else(|| anyhow!("expected ID=STRATEGY, got `{value}`"))?;
        let mut chars = id.chars();
        let id = match (chars.next(), chars.next()) {
            (Some(id), None) if SpaceType::from_symbol(id).is_none() => id,
            _ => bail!("car id `{id}` must be a single character that is not a track symbol"),
        };
        Ok(Self {
            id,
            strategy: strategy.parse()?,
        })
    }
}

/// Builds one planner per car in car index order.
///
/// Cars without an assignment are parked with [`DoNotMove`].
pub(crate) fn build(
    world: &World,
    assignments: &[CarAssignment],
    config: &Config,
    search: Search,
) -> Result<Vec<Box<dyn MoveStrategy>>> {
    let count = query::car_count(world);
    let mut choices = vec![StrategyChoice::DoNotMove; count];
    let mut assigned = vec![false; count];

    for assignment in assignments {
        let index = (0..count)
            .find(|&index| query::car_id(world, index).ok() == Some(assignment.id))
            .ok_or_else(|| anyhow!("the track has no car `{}`", assignment.id))?;
        if assigned[index] {
            bail!("car `{}` was assigned more than once", assignment.id);
        }
        assigned[index] = true;
        choices[index] = assignment.strategy.clone();
    }

    choices
        .into_iter()
        .enumerate()
        .map(|(index, choice)| strategy_for(world, index, choice, config, search))
        .collect()
}

fn strategy_for(
    world: &World,
    index: usize,
    choice: StrategyChoice,
    config: &Config,
    search: Search,
) -> Result<Box<dyn MoveStrategy>> {
    let strategy: Box<dyn MoveStrategy> = match choice {
        StrategyChoice::User => {
            let id = query::car_id(world, index)?;
            Box::new(UserMove::stdio(id))
        }
        StrategyChoice::DoNotMove => Box::new(DoNotMove),
        StrategyChoice::PathFinder => Box::new(PathFinder::for_car(world, index, search)?),
        StrategyChoice::MoveList(file) => {
            let path = config.resolve(FileKind::MoveList, &file);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read move list at {}", path.display()))?;
            let moves = MoveList::parse(&text)
                .with_context(|| format!("invalid move list at {}", path.display()))?;
            Box::new(moves)
        }
        StrategyChoice::PathFollower(file) => {
            let path = config.resolve(FileKind::Waypoints, &file);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read waypoints at {}", path.display()))?;
            let waypoints = Waypoints::parse(&text)
                .with_context(|| format!("invalid waypoints at {}", path.display()))?;
            let start = query::car_position(world, index)?;
            let follower = PathFollower::plan(start, &waypoints)
                .with_context(|| format!("cannot follow waypoints in {}", path.display()))?;
            Box::new(follower)
        }
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use racetrack_core::StrategyKind;

    const LANE: &str = "#######\n#<  a #\n#   b #\n#######\n";

    #[test]
    fn parses_assignments() {
        let assignment: CarAssignment = "a=move-list:quarter.txt".parse().expect("valid");
        assert_eq!(assignment.id, 'a');
        assert_eq!(
            assignment.strategy,
            StrategyChoice::MoveList(PathBuf::from("quarter.txt"))
        );
        let assignment: CarAssignment = "b=path-finder".parse().expect("valid");
        assert_eq!(assignment.strategy, StrategyChoice::PathFinder);
    }

    #[test]
    fn rejects_malformed_assignments() {
        for text in [
            "a",
            "ab=user",
            "#=user",
            " =user",
            "^=path-finder",
            "a=teleport",
            "a=move-list",
            "a=move-list:",
            "a=user:moves.txt",
        ] {
            assert!(text.parse::<CarAssignment>().is_err(), "{text} parsed");
        }
    }

    #[test]
    fn any_non_track_symbol_names_a_car() {
        let world = World::parse("#######\n#<  A #\n#   1 #\n#######\n").expect("valid track");
        let assignments: [CarAssignment; 2] = [
            "1=do-not-move".parse().expect("digit id"),
            "A=path-finder".parse().expect("upper-case id"),
        ];
        let strategies = build(&world, &assignments, &Config::default(), Search::Cells)
            .expect("lineup builds");
        let kinds: Vec<_> = strategies.iter().map(|strategy| strategy.kind()).collect();
        assert_eq!(kinds, vec![StrategyKind::PathFinder, StrategyKind::DoNotMove]);

        let crash_symbol: CarAssignment = "X=user".parse().expect("X is a car id");
        assert_eq!(crash_symbol.id, 'X');
    }

    #[test]
    fn unassigned_cars_do_not_move() {
        let world = World::parse(LANE).expect("valid track");
        let assignments: [CarAssignment; 1] = ["b=path-finder".parse().expect("valid")];
        let strategies = build(&world, &assignments, &Config::default(), Search::Cells)
            .expect("lineup builds");
        let kinds: Vec<_> = strategies.iter().map(|strategy| strategy.kind()).collect();
        assert_eq!(kinds, vec![StrategyKind::DoNotMove, StrategyKind::PathFinder]);
    }

    #[test]
    fn rejects_unknown_and_repeated_cars() {
        let world = World::parse(LANE).expect("valid track");
        let unknown: [CarAssignment; 1] = ["c=user".parse().expect("valid")];
        assert!(build(&world, &unknown, &Config::default(), Search::Cells).is_err());

        let repeated: [CarAssignment; 2] = [
            "a=path-finder".parse().expect("valid"),
            "a=do-not-move".parse().expect("valid"),
        ];
        let error = build(&world, &repeated, &Config::default(), Search::Cells)
            .err()
            .expect("repeated car is rejected");
        assert!(error.to_string().contains("more than once"));
    }

    #[test]
    fn missing_move_list_names_the_file() {
        let world = World::parse(LANE).expect("valid track");
        let assignments: [CarAssignment; 1] =
            ["a=move-list:no-such-moves.txt".parse().expect("valid")];
        let error = build(&world, &assignments, &Config::default(), Search::Cells)
            .err()
            .expect("missing file is rejected");
        assert!(error.to_string().contains("no-such-moves.txt"));
    }
}
