//! Input checks that run before any lookup. All failures are
//! [`Error::InvalidArgument`].

use chrono::NaiveDate;

use crate::{Error, Result, person::Identity};

pub fn name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::InvalidArgument("Name must not be blank".into()));
  }
  Ok(name.to_owned())
}

pub fn email(email: &str) -> Result<String> {
  let email = email.trim();
  if email.is_empty() {
    return Err(Error::InvalidArgument("Email must not be blank".into()));
  }
  let well_formed = email
    .split_once('@')
    .is_some_and(|(local, domain)| {
      !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    })
    && !email.contains(char::is_whitespace);
  if !well_formed {
    return Err(Error::InvalidArgument(format!(
      "Email {email} is not a valid address"
    )));
  }
  Ok(email.to_owned())
}

pub fn date_of_birth(dob: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
  if dob >= today {
    return Err(Error::InvalidArgument(format!(
      "Date of birth {dob} must be in the past"
    )));
  }
  Ok(dob)
}

/// Codes are compared verbatim, so they are not trimmed.
pub fn code(code: &str) -> Result<&str> {
  if code.trim().is_empty() {
    return Err(Error::InvalidArgument("Code must not be blank".into()));
  }
  Ok(code)
}

pub fn plan(plan: &str) -> Result<String> {
  let plan = plan.trim();
  if plan.is_empty() {
    return Err(Error::InvalidArgument("Workout plan must not be blank".into()));
  }
  Ok(plan.to_owned())
}

/// At least one plan; each non-blank and listed once.
pub fn workout_plans(plans: &[String]) -> Result<Vec<String>> {
  if plans.is_empty() {
    return Err(Error::InvalidArgument(
      "At least one workout plan is required".into(),
    ));
  }
  let mut out: Vec<String> = Vec::with_capacity(plans.len());
  for p in plans {
    let p = plan(p)?;
    if out.contains(&p) {
      return Err(Error::InvalidArgument(format!(
        "Workout plan {p} is listed twice"
      )));
    }
    out.push(p);
  }
  Ok(out)
}

pub fn membership_date(date: &str) -> Result<String> {
  let date = date.trim();
  if date.is_empty() {
    return Err(Error::InvalidArgument(
      "Membership date must not be blank".into(),
    ));
  }
  Ok(date.to_owned())
}

pub fn identity(identity: &Identity, today: NaiveDate) -> Result<Identity> {
  Ok(Identity {
    name:          name(&identity.name)?,
    date_of_birth: date_of_birth(identity.date_of_birth, today)?,
    email:         email(&identity.email)?,
  })
}
