use crate::error::{Error, Result};
use crate::types::{Assignment, GroupAssignment, Preferences, Settings};
use good_lp::Solution as LpSolution;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, SolverModel, Variable, variable, variables,
};
use log::{debug, info};
use std::collections::BTreeMap;

#[cfg(not(any(feature = "microlp", feature = "cbc")))]
compile_error!("enable the `microlp` or `cbc` feature to select a solver backend");

/// Slack when turning a real-valued size bound into a whole number of people.
const EPSILON: f64 = 1e-9;

impl Preferences {
    /// Choose `settings.groups_to_choose` groups and place every person in
    /// exactly one of them, minimising the summed preference scores while
    /// keeping every chosen group between `average` and `average + 1` people.
    pub fn solve(&self, settings: &Settings) -> Result<Assignment> {
        let people = &self.people;
        let groups = &self.groups;

        check_scores(self)?;
        check_feasibility(people.len(), groups.len(), settings)?;
        let average = settings.average(people.len());

        // Create all variables, and LUTs of type (person, group) → Variable
        let (variables, assignment_map, chosen_map) = init_variables(people, groups);
        debug!(
            "Model has {} assignment and {} group variables, group size bounds [{average}, {}]",
            assignment_map.len(),
            chosen_map.len(),
            average + 1.0
        );

        let objective = create_objective_function(self, &assignment_map);
        let model = create_model(variables, objective, settings);

        let model = constrain_each_person_to_one_group(model, people, groups, &assignment_map);
        let wanted = settings.groups_to_choose;
        let model = constrain_number_of_chosen_groups(model, groups, &chosen_map, wanted);
        let model =
            constrain_group_sizes(model, people, groups, &assignment_map, &chosen_map, average);

        let solution = model.solve().map_err(resolution_error)?;

        let assignment = create_assignment(&solution, self, &assignment_map, &chosen_map);
        verify_assignment(&assignment, self, wanted)?;

        info!(
            "Chose groups {:?} with total preference cost {}",
            assignment
                .groups
                .iter()
                .filter(|group| group.chosen)
                .map(|group| group.label.as_str())
                .collect::<Vec<_>>(),
            assignment.cost
        );
        Ok(assignment)
    }
}

type PersonGroupToVariableMap = BTreeMap<(String, String), Variable>;
type GroupToVariableMap = BTreeMap<String, Variable>;

fn check_scores(preferences: &Preferences) -> Result<()> {
    for person in &preferences.people {
        for group in &preferences.groups {
            if preferences.score(person, group).is_none() {
                return Err(Error::MissingScore {
                    person: person.clone(),
                    group: group.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Reject problems whose selection or balance constraints cannot be met,
/// before handing anything to the solver.
fn check_feasibility(people: usize, groups: usize, settings: &Settings) -> Result<()> {
    let wanted = settings.groups_to_choose;
    if wanted == 0 {
        return Err(Error::Infeasible(
            "at least one group has to be chosen".to_owned(),
        ));
    }
    if groups < wanted {
        return Err(Error::Infeasible(format!(
            "cannot choose {wanted} groups from {groups} candidate groups"
        )));
    }

    let average = settings.average(people);
    let smallest = (average - EPSILON).ceil() as usize;
    let largest = (average + 1.0 + EPSILON).floor() as usize;
    if people < wanted * smallest || people > wanted * largest {
        return Err(Error::Infeasible(format!(
            "{people} people cannot be split into {wanted} groups of {smallest} to {largest} members"
        )));
    }
    Ok(())
}

fn init_variables(
    people: &[String],
    groups: &[String],
) -> (ProblemVariables, PersonGroupToVariableMap, GroupToVariableMap) {
    let mut problem_vars = variables!();
    let mut assignment_map = BTreeMap::new();
    let mut chosen_map = BTreeMap::new();

    for person in people {
        for group in groups {
            // 1 when this person is placed in this group
            let assigned = problem_vars.add(variable().binary());
            assignment_map.insert((person.clone(), group.clone()), assigned);
        }
    }

    for group in groups {
        // 1 when this group is one of the active destination groups
        let chosen = problem_vars.add(variable().binary());
        chosen_map.insert(group.clone(), chosen);
    }

    (problem_vars, assignment_map, chosen_map)
}

fn create_objective_function(
    preferences: &Preferences,
    assignment_map: &PersonGroupToVariableMap,
) -> Expression {
    assignment_map.iter().fold(
        Expression::from(0.0),
        |sum, ((person, group), &assigned)| {
            let score = preferences.score(person, group).unwrap_or_default();
            sum + assigned * score as f64
        },
    )
}

/// Create a model minimising the given objective with COIN-OR CBC
#[cfg(feature = "cbc")]
fn create_model(
    variables: ProblemVariables,
    objective: Expression,
    settings: &Settings,
) -> impl SolverModel<Error = ResolutionError> {
    use good_lp::solvers::coin_cbc::coin_cbc;

    let mut model = variables.minimise(objective).using(coin_cbc);
    #[cfg(not(debug_assertions))]
    model.set_parameter("loglevel", "0");
    if let Some(seconds) = settings.time_limit_seconds {
        model.set_parameter("seconds", &seconds.to_string());
    }
    model
}

/// Create a model minimising the given objective with the pure Rust microlp backend
#[cfg(all(feature = "microlp", not(feature = "cbc")))]
fn create_model(
    variables: ProblemVariables,
    objective: Expression,
    settings: &Settings,
) -> impl SolverModel<Error = ResolutionError> {
    if let Some(seconds) = settings.time_limit_seconds {
        log::warn!("Ignoring time limit of {seconds}s, the microlp backend has no time limit");
    }
    variables.minimise(objective).using(good_lp::microlp)
}

/// Every person ends up in exactly one group
fn constrain_each_person_to_one_group<Model: SolverModel>(
    model: Model,
    people: &[String],
    groups: &[String],
    assignment_map: &PersonGroupToVariableMap,
) -> Model {
    people.iter().fold(model, |m, person| {
        let zero = Expression::from(0.0);
        let placements = groups
            .iter()
            .map(|group| assignment_map[&(person.clone(), group.clone())])
            .fold(zero, |sum, assigned| sum + assigned);
        m.with(placements.eq(1.0))
    })
}

/// Exactly `wanted` groups are active
fn constrain_number_of_chosen_groups<Model: SolverModel>(
    model: Model,
    groups: &[String],
    chosen_map: &GroupToVariableMap,
    wanted: usize,
) -> Model {
    let zero = Expression::from(0.0);
    let chosen_groups = groups
        .iter()
        .map(|group| chosen_map[group])
        .fold(zero, |sum, chosen| sum + chosen);
    model.with(chosen_groups.eq(wanted as f64))
}

/// Keep each group between `average * chosen` and `(average + 1) * chosen`
/// members. An unchosen group is therefore empty.
fn constrain_group_sizes<Model: SolverModel>(
    model: Model,
    people: &[String],
    groups: &[String],
    assignment_map: &PersonGroupToVariableMap,
    chosen_map: &GroupToVariableMap,
    average: f64,
) -> Model {
    groups.iter().fold(model, |m, group| {
        let zero = Expression::from(0.0);
        let members = people
            .iter()
            .map(|person| assignment_map[&(person.clone(), group.clone())])
            .fold(zero, |sum, assigned| sum + assigned);
        let chosen = chosen_map[group];

        m.with((members.clone() - chosen * average).geq(0.0))
            .with((members - chosen * (average + 1.0)).leq(0.0))
    })
}

fn resolution_error(error: ResolutionError) -> Error {
    match error {
        ResolutionError::Infeasible => Error::Infeasible(
            "no assignment satisfies the group selection and size constraints".to_owned(),
        ),
        other => Error::Solver(other.to_string()),
    }
}

/// Read the solved variables back into per-group member lists
fn create_assignment(
    solution: &impl LpSolution,
    preferences: &Preferences,
    assignment_map: &PersonGroupToVariableMap,
    chosen_map: &GroupToVariableMap,
) -> Assignment {
    let mut members: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut cost = 0;

    for person in &preferences.people {
        for group in &preferences.groups {
            let assigned = assignment_map[&(person.clone(), group.clone())];
            if solution.value(assigned) > 0.5 {
                members.entry(group.as_str()).or_default().push(person.clone());
                cost += u64::from(preferences.score(person, group).unwrap_or_default());
            }
        }
    }

    let groups = preferences
        .groups
        .iter()
        .map(|group| GroupAssignment {
            label: group.clone(),
            chosen: solution.value(chosen_map[group]) > 0.5,
            members: members.remove(group.as_str()).unwrap_or_default(),
        })
        .collect();

    Assignment { groups, cost }
}

fn verify_assignment(
    assignment: &Assignment,
    preferences: &Preferences,
    wanted: usize,
) -> Result<()> {
    for person in &preferences.people {
        let placements = assignment
            .groups
            .iter()
            .filter(|group| group.members.contains(person))
            .count();
        if placements != 1 {
            return Err(Error::Solver(format!(
                "solution places {person:?} in {placements} groups"
            )));
        }
    }

    let chosen = assignment.groups.iter().filter(|group| group.chosen).count();
    if chosen != wanted {
        return Err(Error::Solver(format!(
            "solution chooses {chosen} groups instead of {wanted}"
        )));
    }

    if let Some(group) = assignment.occupied().find(|group| !group.chosen) {
        return Err(Error::Solver(format!(
            "solution places people in unchosen group {:?}",
            group.label
        )));
    }
    Ok(())
}
