//! Final standings.

use std::fmt;

use serde::Serialize;

/// Agents grouped by final score, best first. Agents with equal scores share
/// a group and a rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    groups: Vec<Vec<usize>>,
}

impl Ranking {
    /// Rank agents by `scores`, indexed by agent.
    #[must_use]
    pub fn from_scores(scores: &[i32]) -> Self {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|a, b| scores[*b].cmp(&scores[*a]).then(a.cmp(b)));

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for agent in order {
            match groups.last_mut() {
                Some(group) if scores[group[0]] == scores[agent] => group.push(agent),
                _ => groups.push(vec![agent]),
            }
        }
        Self { groups }
    }

    /// Rank groups, best first.
    #[must_use]
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// The sole winner, if the top score is not shared.
    #[must_use]
    pub fn winner(&self) -> Option<usize> {
        match self.groups.first() {
            Some(group) if group.len() == 1 => Some(group[0]),
            _ => None,
        }
    }

    /// True when the top score is shared.
    #[must_use]
    pub fn is_joint(&self) -> bool {
        self.groups.first().is_some_and(|g| g.len() > 1)
    }

    /// Rank of `agent`, 0 being best.
    #[must_use]
    pub fn rank_of(&self, agent: usize) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(&agent))
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for agent in group {
                write!(f, "{agent}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_order() {
        let ranking = Ranking::from_scores(&[10, 40]);
        assert_eq!(ranking.to_string(), "1 0");
        assert_eq!(ranking.winner(), Some(1));
        assert!(!ranking.is_joint());
        assert_eq!(ranking.rank_of(0), Some(1));
    }

    #[test]
    fn test_tie_is_joint() {
        let ranking = Ranking::from_scores(&[7, 7]);
        assert_eq!(ranking.to_string(), "01");
        assert_eq!(ranking.winner(), None);
        assert!(ranking.is_joint());
        assert_eq!(ranking.rank_of(1), Some(0));
    }

    #[test]
    fn test_eliminated_last() {
        let ranking = Ranking::from_scores(&[-1, 0, 0]);
        assert_eq!(ranking.groups(), &[vec![1, 2], vec![0]]);
        assert_eq!(ranking.to_string(), "12 0");
    }
}
