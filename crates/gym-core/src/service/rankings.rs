//! Aggregate queries over members and coaches.
//!
//! Ties go to the record seen first in registration order: the running best
//! starts at the first element and is only replaced by a strictly better one.

use std::cmp::Ordering;

use crate::{
  Error, Result,
  person::{Coach, Lift, Member},
  store::GymStore,
};

use super::{GymService, clients::no_coaches};

impl<S: GymStore> GymService<S> {
  /// The member with the highest value for `lift`.
  pub async fn highest(&self, lift: Lift) -> Result<Member> {
    let members = self.store.list_members().await.map_err(Error::store)?;
    first_extreme(members, |m| m.lifts.get(lift), Ordering::Greater)
      .ok_or_else(|| Error::NotFound("No members are registered".into()))
  }

  pub async fn highest_bench(&self) -> Result<Member> { self.highest(Lift::Bench).await }

  pub async fn highest_squat(&self) -> Result<Member> { self.highest(Lift::Squat).await }

  pub async fn highest_deadlift(&self) -> Result<Member> {
    self.highest(Lift::Deadlift).await
  }

  pub async fn highest_total(&self) -> Result<Member> { self.highest(Lift::Total).await }

  /// Members whose total is strictly greater than `threshold`. May be empty.
  pub async fn members_above_total(&self, threshold: u64) -> Result<Vec<Member>> {
    let members = self.store.list_members().await.map_err(Error::store)?;
    Ok(
      members
        .into_iter()
        .filter(|m| m.lifts.total() > threshold)
        .collect(),
    )
  }

  pub async fn coach_with_most_clients(&self) -> Result<Coach> {
    let coaches = self.store.list_coaches().await.map_err(Error::store)?;
    first_extreme(coaches, |c| c.clients.len(), Ordering::Greater).ok_or_else(no_coaches)
  }

  pub async fn coach_with_fewest_clients(&self) -> Result<Coach> {
    let coaches = self.store.list_coaches().await.map_err(Error::store)?;
    first_extreme(coaches, |c| c.clients.len(), Ordering::Less).ok_or_else(no_coaches)
  }
}

/// First element whose key compares as `wanted` against every earlier
/// candidate. `Iterator::max_by_key` keeps the last maximum, so it is not
/// used here.
fn first_extreme<T, K: Ord>(
  items: Vec<T>,
  key: impl Fn(&T) -> K,
  wanted: Ordering,
) -> Option<T> {
  let mut items = items.into_iter();
  let mut best = items.next()?;
  let mut best_key = key(&best);
  for item in items {
    let k = key(&item);
    if k.cmp(&best_key) == wanted {
      best = item;
      best_key = k;
    }
  }
  Some(best)
}
