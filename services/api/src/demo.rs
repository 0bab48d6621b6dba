use crate::infra::{
    parse_course_spec, sample_candidates, sample_courses, InMemoryAdmissionRepository,
    InMemoryPublicationGate, InMemoryRulesStore,
};
use admission_core::allocation::{
    AllocationService, Candidate, CategoryRules, CourseId, CourseRecord,
};
use admission_core::error::AppError;
use admission_core::roster::parse_roster;
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Candidate roster CSV (`Candidate ID,Exam Rank,Category,Preferences`);
    /// defaults to a built-in sample
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Course capacity as CODE=SEATS or CODE:Name=SEATS (repeatable)
    #[arg(long = "course", value_parser = parse_course_spec)]
    pub(crate) courses: Vec<CourseRecord>,
    /// SC reservation percentage
    #[arg(long, default_value_t = 15)]
    pub(crate) sc_percent: u8,
    /// ST reservation percentage
    #[arg(long, default_value_t = 7)]
    pub(crate) st_percent: u8,
    /// OBC reservation percentage
    #[arg(long, default_value_t = 27)]
    pub(crate) obc_percent: u8,
    /// EWS reservation percentage
    #[arg(long, default_value_t = 10)]
    pub(crate) ews_percent: u8,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let candidates = match &args.roster {
        Some(path) => parse_roster(File::open(path)?)?,
        None => sample_candidates(),
    };
    let courses = if args.courses.is_empty() {
        sample_courses()
    } else {
        args.courses.clone()
    };
    let rules = CategoryRules {
        sc: args.sc_percent,
        st: args.st_percent,
        obc: args.obc_percent,
        ews: args.ews_percent,
    };

    let repository = Arc::new(InMemoryAdmissionRepository::seeded(
        candidates.clone(),
        courses.clone(),
    ));
    let service = AllocationService::new(
        repository,
        Arc::new(InMemoryRulesStore::with_rules(rules)),
        Arc::new(InMemoryPublicationGate::default()),
    );

    let summary = service.run_allocation()?;
    println!(
        "Allocated {} of {} candidates in {} round(s)\n",
        summary.allocated, summary.total_candidates, summary.rounds
    );

    print_assignments(&service, &candidates, &courses)?;
    print_seat_matrix(&service)?;

    Ok(())
}

fn print_assignments(
    service: &AllocationService<
        InMemoryAdmissionRepository,
        InMemoryRulesStore,
        InMemoryPublicationGate,
    >,
    candidates: &[Candidate],
    courses: &[CourseRecord],
) -> Result<(), AppError> {
    let course_names: BTreeMap<&CourseId, &str> = courses
        .iter()
        .map(|course| (&course.id, course.name.as_str()))
        .collect();

    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by_key(|candidate| (candidate.rank, candidate.id));

    println!("{:>6}  {:>9}  {:<8}  {}", "rank", "candidate", "category", "allocation");
    for candidate in ordered {
        let seat = service
            .allocation_for(&candidate.id)?
            .map(|record| {
                let name = course_names
                    .get(&record.course_id)
                    .copied()
                    .unwrap_or(record.course_id.0.as_str());
                format!("{} ({})", record.course_id.0, name)
            })
            .unwrap_or_else(|| "-- not allocated --".to_string());

        println!(
            "{:>6}  {:>9}  {:<8}  {}",
            candidate.rank,
            candidate.id.0,
            candidate.category.label(),
            seat
        );
    }
    println!();
    Ok(())
}

fn print_seat_matrix(
    service: &AllocationService<
        InMemoryAdmissionRepository,
        InMemoryRulesStore,
        InMemoryPublicationGate,
    >,
) -> Result<(), AppError> {
    println!(
        "{:<8}  {:>5}  {:>7}  {:>4}  {:>4}  {:>4}  {:>4}  {:>9}",
        "course", "total", "general", "sc", "st", "obc", "ews", "available"
    );
    for seats in service.seat_matrix()? {
        println!(
            "{:<8}  {:>5}  {:>7}  {:>4}  {:>4}  {:>4}  {:>4}  {:>9}",
            seats.course_id.0,
            seats.total_seats,
            seats.general,
            seats.sc,
            seats.st,
            seats.obc,
            seats.ews,
            seats.available
        );
    }
    Ok(())
}
