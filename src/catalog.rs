use crate::model::{
    CalendarEvent, EventCategory, School, SchoolClass, Shift, Student, StudentStatus, Subject,
    Teacher,
};

/// Static reference data for the single school this diary serves. Loaded
/// once, never mutated at runtime; only the calendar is user-extendable, and
/// that happens in the store on top of the seed returned here.

pub fn school() -> School {
    School {
        name: "UNIDADE INTEGRADA MUNICIPAL SANTA LUZIA".to_string(),
        registry_number: "21231001".to_string(),
    }
}

pub fn teacher() -> Teacher {
    Teacher {
        name: "PROFESSOR TITULAR DA TURMA".to_string(),
        staff_registry: "PROF_TITULAR".to_string(),
    }
}

pub fn subjects() -> Vec<Subject> {
    vec![
        Subject {
            id: "LI".to_string(),
            code: "LI".to_string(),
            name: "Língua Inglesa".to_string(),
            weekly_hours: 80,
        },
        Subject {
            id: "LP".to_string(),
            code: "LP".to_string(),
            name: "Língua Portuguesa".to_string(),
            weekly_hours: 200,
        },
        Subject {
            id: "PT".to_string(),
            code: "PT".to_string(),
            name: "Produção de Texto".to_string(),
            weekly_hours: 40,
        },
    ]
}

fn roster(class_id: &str, count: usize) -> Vec<Student> {
    (1..=count)
        .map(|n| Student {
            id: format!("{}{:02}", class_id, n),
            name: format!("ALUNO {:02} DA TURMA {}", n, class_id),
            call_number: n as i64,
            status: StudentStatus::Active,
        })
        .collect()
}

pub fn classes() -> Vec<SchoolClass> {
    vec![
        SchoolClass {
            id: "6A".to_string(),
            name: "6º ANO A".to_string(),
            grade_level: "6º ANO (9 ANOS)".to_string(),
            shift: Shift::Morning,
            students: roster("6A", 18),
        },
        SchoolClass {
            id: "6B".to_string(),
            name: "6º ANO B".to_string(),
            grade_level: "6º ANO (9 ANOS)".to_string(),
            shift: Shift::Morning,
            students: roster("6B", 5),
        },
        SchoolClass {
            id: "7U".to_string(),
            name: "7º ANO U".to_string(),
            grade_level: "7º ANO (9 ANOS)".to_string(),
            shift: Shift::Morning,
            students: roster("7U", 5),
        },
        SchoolClass {
            id: "8U".to_string(),
            name: "8º ANO U".to_string(),
            grade_level: "8º ANO (9 ANOS)".to_string(),
            shift: Shift::Morning,
            students: roster("8U", 5),
        },
        SchoolClass {
            id: "9U".to_string(),
            name: "9º ANO U".to_string(),
            grade_level: "9º ANO (9 ANOS)".to_string(),
            shift: Shift::Morning,
            students: roster("9U", 5),
        },
    ]
}

pub fn class_by_id(class_id: &str) -> Option<SchoolClass> {
    classes().into_iter().find(|c| c.id == class_id)
}

pub fn subject_by_id(subject_id: &str) -> Option<Subject> {
    subjects().into_iter().find(|s| s.id == subject_id)
}

fn seed_event(id: &str, date: &str, title: &str, category: EventCategory) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        date: date.to_string(),
        title: title.to_string(),
        category,
        description: None,
    }
}

/// 2026 school calendar seed (municipal education department). Default
/// payload of the `calendario` slot; users add, edit and delete on top.
pub fn calendar_2026() -> Vec<CalendarEvent> {
    use EventCategory::*;
    vec![
        seed_event("1", "2026-01-01", "Confraternização Universal", Holiday),
        seed_event("2", "2026-01-20", "Início do Ano Letivo", InstructionalDay),
        seed_event("3", "2026-02-16", "Carnaval", Holiday),
        seed_event("4", "2026-02-17", "Carnaval", Holiday),
        seed_event("5", "2026-02-18", "Quarta-feira de Cinzas", Holiday),
        seed_event("6", "2026-03-08", "Dia Internacional da Mulher", Holiday),
        seed_event("7", "2026-03-27", "Paixão de Cristo", Holiday),
        seed_event("8", "2026-04-21", "Tiradentes", Holiday),
        seed_event("9", "2026-04-22", "Descobrimento do Brasil", Holiday),
        seed_event("10", "2026-04-23", "Recesso Escolar", Recess),
        seed_event("11", "2026-04-24", "Recesso Escolar", Recess),
        seed_event("12", "2026-04-25", "Recesso Escolar", Recess),
        seed_event("13", "2026-05-01", "Dia do Trabalho", Holiday),
        seed_event("14", "2026-05-14", "Dia das Mães", Event),
        seed_event("15", "2026-05-15", "Recesso Escolar", Recess),
        seed_event("16", "2026-05-16", "Recesso Escolar", Recess),
        seed_event("17", "2026-06-04", "Corpus Christi", Holiday),
        seed_event("18", "2026-06-12", "Dia dos Namorados", Event),
        seed_event("19", "2026-06-19", "Dia do Orgulho LGBTQIA+", Event),
        seed_event("20", "2026-06-24", "São João", Holiday),
        seed_event("21", "2026-06-29", "São Pedro", Holiday),
        seed_event("22", "2026-07-13", "Início do 2º Semestre", InstructionalDay),
        seed_event("23", "2026-07-20", "Recesso Escolar", Recess),
        seed_event("24", "2026-07-21", "Recesso Escolar", Recess),
        seed_event("25", "2026-07-22", "Recesso Escolar", Recess),
        seed_event("26", "2026-07-23", "Recesso Escolar", Recess),
        seed_event("27", "2026-07-24", "Recesso Escolar", Recess),
        seed_event("28", "2026-08-11", "Dia do Estudante", Event),
        seed_event("29", "2026-08-15", "Dia dos Pais", Event),
        seed_event("30", "2026-09-07", "Independência do Brasil", Holiday),
        seed_event("31", "2026-09-08", "Dia da Alfabetização", Event),
        seed_event("32", "2026-10-03", "Dia da Amazônia", Event),
        seed_event("33", "2026-10-12", "Nossa Senhora Aparecida", Holiday),
        seed_event("34", "2026-10-15", "Dia do Professor", Event),
        seed_event("35", "2026-10-16", "Recesso Escolar", Recess),
        seed_event("36", "2026-10-17", "Recesso Escolar", Recess),
        seed_event("37", "2026-10-28", "Dia do Servidor Público", Holiday),
        seed_event("38", "2026-11-02", "Finados", Holiday),
        seed_event("39", "2026-11-15", "Proclamação da República", Holiday),
        seed_event("40", "2026-11-20", "Consciência Negra", Holiday),
        seed_event("41", "2026-11-27", "Recesso Escolar", Recess),
        seed_event("42", "2026-11-28", "Recesso Escolar", Recess),
        seed_event("43", "2026-12-18", "Encerramento do Ano Letivo", Event),
        seed_event("44", "2026-12-25", "Natal", Holiday),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_consistent() {
        let classes = classes();
        assert_eq!(classes.len(), 5);
        for c in &classes {
            for (i, s) in c.students.iter().enumerate() {
                assert_eq!(s.call_number, i as i64 + 1);
                assert!(s.id.starts_with(&c.id));
            }
        }
        assert!(class_by_id("6A").is_some());
        assert!(class_by_id("nope").is_none());
        assert_eq!(subjects().len(), 3);
        assert!(subject_by_id("LP").is_some());
    }

    #[test]
    fn calendar_seed_is_sorted_with_unique_ids() {
        let events = calendar_2026();
        let mut ids = std::collections::HashSet::new();
        for e in &events {
            assert!(ids.insert(e.id.clone()), "duplicate id {}", e.id);
            assert!(e.date.starts_with("2026-"));
        }
        let dates: Vec<&str> = events.iter().map(|e| e.date.as_str()).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]), "seed not date-ordered");
    }
}
