//! Seed the database with sample content for local development.

use constructivo_server::db::{ProjectRepository, SettingsRepository, TestimonialRepository};
use constructivo_server::models::{NewProject, NewTestimonial, Theme};

use super::CommandError;

/// Insert sample projects, testimonials and default theme settings.
///
/// Idempotence is not attempted; running twice inserts duplicates. Meant for
/// fresh local databases only.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let projects = ProjectRepository::new(&pool);
    for new in sample_projects() {
        let project = projects.create(&new).await?;
        tracing::info!(project_id = %project.id, title = %project.title, "Seeded project");
    }

    let testimonials = TestimonialRepository::new(&pool);
    for new in sample_testimonials() {
        let testimonial = testimonials.create(&new).await?;
        // Seeded testimonials go straight to the public site.
        testimonials.set_status(testimonial.id, true, false).await?;
        tracing::info!(testimonial_id = %testimonial.id, "Seeded testimonial");
    }

    SettingsRepository::new(&pool)
        .upsert_theme(&Theme::default())
        .await?;
    tracing::info!("Seeded default theme");

    tracing::info!("Seeding complete");
    Ok(())
}

fn sample_projects() -> Vec<NewProject> {
    vec![
        NewProject {
            title: "Riverside Office Complex".to_string(),
            description: "Four-story commercial build with a glazed atrium and rooftop terrace."
                .to_string(),
            category: "commercial".to_string(),
            images: vec!["/images/projects/riverside-1.jpg".to_string()],
            featured: true,
        },
        NewProject {
            title: "Hillcrest Family Home".to_string(),
            description: "Custom three-bedroom residence with passive-house insulation."
                .to_string(),
            category: "residential".to_string(),
            images: vec!["/images/projects/hillcrest-1.jpg".to_string()],
            featured: false,
        },
        NewProject {
            title: "Old Mill Renovation".to_string(),
            description: "Heritage mill converted into mixed retail and studio space."
                .to_string(),
            category: "renovation".to_string(),
            images: vec![],
            featured: false,
        },
    ]
}

fn sample_testimonials() -> Vec<NewTestimonial> {
    vec![
        NewTestimonial {
            name: "Dana Whitfield".to_string(),
            role: "Homeowner".to_string(),
            content: "The crew kept every deadline and the finish quality is superb.".to_string(),
        },
        NewTestimonial {
            name: "Marcus Lee".to_string(),
            role: "Facility Manager".to_string(),
            content: "Clear communication from quote to handover. Would hire again.".to_string(),
        },
    ]
}
