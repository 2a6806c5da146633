// Prompt constants for curriculum generation.
// The JSON-only system prompt is shared from llm_client::prompts.

/// Curriculum generation prompt.
/// Replace: {program_name}, {domain}, {duration}, {total_semesters},
///          {industry_focus_line}, {bloom_levels}
pub const CURRICULUM_PROMPT_TEMPLATE: &str = r#"You are an expert academic curriculum designer. Generate a complete, detailed curriculum for the following program:

Program: {program_name}
Domain: {domain}
Duration: {duration} years ({total_semesters} semesters)
{industry_focus_line}

Requirements:
1. Create a semester-wise course structure for all {total_semesters} semesters
2. Each semester: 5-6 subjects (Core, Elective, Lab, Project types)
3. Each subject: 3-5 topics with hours; 3-4 Course Outcomes (COs)
4. Map each topic and CO to the appropriate Bloom's taxonomy level ({bloom_levels})
5. Progress from foundational courses in early semesters to advanced/specialized courses in later semesters
6. Include practical labs, projects, and industry-relevant electives
7. Total credits per semester should be 20-24
8. Generate 8-10 high-level Program Outcomes (POs)
9. Ensure the curriculum is modern, industry-aligned, and follows best practices in education

Be thorough and realistic - this should resemble an actual university curriculum.

IMPORTANT: Respond with ONLY valid JSON - a single object (not array). No markdown, no code blocks. Structure:
{
  "programName": "...",
  "domain": "...",
  "totalSemesters": N,
  "totalCredits": N,
  "semesters": [
    {
      "semester": 1,
      "totalCredits": N,
      "subjects": [
        {
          "code": "...",
          "name": "...",
          "credits": N,
          "type": "Core | Elective | Lab | Project",
          "topics": [{"name": "...", "hours": N, "bloomLevel": "..."}],
          "courseOutcomes": [{"code": "CO1", "description": "...", "bloomLevel": "..."}]
        }
      ]
    }
  ],
  "programOutcomes": ["..."]
}
Use ONLY these Bloom levels: {bloom_levels}."#;
