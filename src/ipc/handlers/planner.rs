use std::thread;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    optional_str, optional_update_str, read_err, required_bimester, required_class, required_str,
    required_subject, store, write_err, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::CurriculumPlan;
use crate::store::SLOT_PLANS;

/// Artificial latency of the assisted-generation stub. Deterministic output
/// after a fixed pause; the client disables its trigger until the reply.
const GENERATE_DELAY_MS: u64 = 400;

fn plans_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;

    let mut plans: Vec<CurriculumPlan> = store.read_slot(SLOT_PLANS, Vec::new).map_err(read_err)?;
    plans.retain(|p| {
        p.class_id == class.id && p.subject_id == subject.id && p.bimester == bimester
    });
    plans.sort_by(|a, b| a.standard_code.cmp(&b.standard_code));
    Ok(json!({ "plans": plans }))
}

fn plans_create(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;

    let plan = CurriculumPlan {
        id: Uuid::new_v4().to_string(),
        class_id: class.id,
        subject_id: subject.id,
        bimester,
        standard_code: required_str(params, "standardCode")?,
        skill: required_str(params, "skill")?,
        knowledge_object: required_str(params, "knowledgeObject")?,
        objectives: required_str(params, "objectives")?,
        content: required_str(params, "content")?,
        methodology: required_str(params, "methodology")?,
        resources: required_str(params, "resources")?,
        assessment: required_str(params, "assessment")?,
    };
    let id = plan.id.clone();
    store
        .update_slot(SLOT_PLANS, Vec::new, |mut plans: Vec<CurriculumPlan>| {
            plans.push(plan);
            plans
        })
        .map_err(write_err)?;
    Ok(json!({ "planId": id }))
}

fn plans_update(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let plan_id = required_str(params, "planId")?;

    let fields = [
        "standardCode",
        "skill",
        "knowledgeObject",
        "objectives",
        "content",
        "methodology",
        "resources",
        "assessment",
    ];
    let mut updates: Vec<(&str, String)> = Vec::new();
    for key in fields {
        if let Some(v) = optional_update_str(params, key)? {
            updates.push((key, v));
        }
    }

    let mut found = false;
    store
        .update_slot(SLOT_PLANS, Vec::new, |mut plans: Vec<CurriculumPlan>| {
            if let Some(p) = plans.iter_mut().find(|p| p.id == plan_id) {
                found = true;
                for (key, value) in &updates {
                    match *key {
                        "standardCode" => p.standard_code = value.clone(),
                        "skill" => p.skill = value.clone(),
                        "knowledgeObject" => p.knowledge_object = value.clone(),
                        "objectives" => p.objectives = value.clone(),
                        "content" => p.content = value.clone(),
                        "methodology" => p.methodology = value.clone(),
                        "resources" => p.resources = value.clone(),
                        "assessment" => p.assessment = value.clone(),
                        _ => {}
                    }
                }
            }
            plans
        })
        .map_err(write_err)?;
    if !found {
        return Err(HandlerErr::not_found("plan not found"));
    }
    Ok(json!({ "ok": true }))
}

fn plans_delete(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let plan_id = required_str(params, "planId")?;
    let mut removed = false;
    store
        .update_slot(SLOT_PLANS, Vec::new, |mut plans: Vec<CurriculumPlan>| {
            let before = plans.len();
            plans.retain(|p| p.id != plan_id);
            removed = plans.len() != before;
            plans
        })
        .map_err(write_err)?;
    if !removed {
        return Err(HandlerErr::not_found("plan not found"));
    }
    Ok(json!({ "ok": true }))
}

/// Assisted generation: a fixed pause, then template substitution from the
/// subject name and standard code. Returns an unsaved draft; the client
/// reviews, edits, and submits it through `planner.create`.
fn plans_generate(
    _state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;
    let standard_code = required_str(params, "standardCode")?;
    let skill = optional_str(params, "skill")
        .unwrap_or_else(|| format!("Habilidade {} da BNCC", standard_code));

    thread::sleep(Duration::from_millis(GENERATE_DELAY_MS));

    Ok(json!({
        "draft": {
            "classId": class.id,
            "subjectId": subject.id,
            "bimester": bimester,
            "standardCode": standard_code,
            "skill": skill,
            "knowledgeObject": format!("Objeto de conhecimento vinculado a {}", standard_code),
            "objectives": format!(
                "Desenvolver a habilidade {} em {} no {}º bimestre, com foco na turma {}.",
                standard_code, subject.name, bimester, class.name
            ),
            "content": format!(
                "Conteúdos de {} alinhados ao descritor {}.",
                subject.name, standard_code
            ),
            "methodology": "Aulas expositivas dialogadas, atividades em duplas e correção coletiva.",
            "resources": "Quadro, livro didático, folhas de atividade e material audiovisual.",
            "assessment": "Avaliação processual por participação e atividade escrita ao final da sequência.",
        }
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "planner.list" => plans_list(state, &req.params),
        "planner.create" => plans_create(state, &req.params),
        "planner.update" => plans_update(state, &req.params),
        "planner.delete" => plans_delete(state, &req.params),
        "planner.generate" => plans_generate(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
